//! Force simulation with an alpha cooling schedule.
//!
//! Each tick accumulates spring, repulsion and centering forces from the
//! positions at the start of the tick, integrates every free node, and then
//! cools alpha towards `alpha_target`. Once alpha drops to `alpha_min` the
//! simulation settles and stops ticking until something reheats it.

use log::{debug, trace};

use super::config::{Repulsion, SimulationConfig};
use super::quadtree::QuadTree;
use super::types::{LinkState, Node};

/// Whether the simulation wants more ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Alpha is at or below `alpha_min`; no ticks are scheduled.
	Settled,
	/// One tick per frame until alpha cools.
	Running,
}

/// Simulation "temperature" and damping.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
	/// Current temperature.
	pub alpha: f64,
	/// Temperature alpha decays towards. Raised while dragging.
	pub alpha_target: f64,
	/// Fraction of the gap to the target closed per tick.
	pub alpha_decay: f64,
	/// Below this the simulation settles.
	pub alpha_min: f64,
	/// Fraction of velocity kept per tick.
	pub velocity_decay: f64,
	phase: Phase,
	ticks: u64,
}

impl SimulationState {
	/// Starts hot, at alpha 1.
	pub fn new(config: &SimulationConfig) -> Self {
		Self {
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: config.alpha_decay,
			alpha_min: config.alpha_min,
			velocity_decay: config.velocity_decay,
			phase: Phase::Running,
			ticks: 0,
		}
	}

	/// Running or settled.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Shorthand for `phase() == Phase::Running`.
	pub fn is_running(&self) -> bool {
		self.phase == Phase::Running
	}

	/// Ticks run since the engine was created.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Raises alpha to at least `alpha` and resumes ticking.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
		self.phase = Phase::Running;
	}

	/// Sets the value alpha converges to. A target above `alpha_min` restarts
	/// ticking, since alpha will climb towards it.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
		if self.alpha_target > self.alpha_min || self.alpha > self.alpha_min {
			self.phase = Phase::Running;
		}
	}

	/// Forces the simulation to settle immediately.
	pub fn stop(&mut self) {
		self.phase = Phase::Settled;
	}

	fn cool(&mut self) {
		self.alpha = self.alpha_target + (self.alpha - self.alpha_target) * (1.0 - self.alpha_decay);
		self.ticks += 1;
		if self.alpha <= self.alpha_min {
			self.phase = Phase::Settled;
		}
	}
}

/// Replaces a non-finite value with zero.
#[inline]
pub(crate) fn finite_or_zero(v: f64) -> f64 {
	if v.is_finite() { v } else { 0.0 }
}

/// Deterministic tiny separation direction for coincident nodes `i < j`,
/// so the pair can still push apart.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
	let angle = (i.wrapping_mul(31).wrapping_add(j) as f64) * GOLDEN_ANGLE;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

/// Spring force on the *source* of a link; the target receives the negation.
pub(crate) fn spring_force(
	source: (f64, f64),
	target: (f64, f64),
	rest: f64,
	spring_constant: f64,
	alpha: f64,
) -> (f64, f64) {
	let (dx, dy) = (target.0 - source.0, target.1 - source.1);
	let d = (dx * dx + dy * dy).sqrt();
	if d == 0.0 || !d.is_finite() {
		return (0.0, 0.0);
	}
	let magnitude = spring_constant * (d - rest) * alpha;
	(
		finite_or_zero(dx / d * magnitude),
		finite_or_zero(dy / d * magnitude),
	)
}

/// Repulsion force on the body at `at` from `mass` bodies at `from`; the
/// source receives the negation. `strength` is negative for repulsion.
pub(crate) fn charge_force(
	at: (f64, f64),
	from: (f64, f64),
	mass: f64,
	strength: f64,
	alpha: f64,
	min_distance: f64,
) -> (f64, f64) {
	let (dx, dy) = (from.0 - at.0, from.1 - at.1);
	let d2 = (dx * dx + dy * dy).max(min_distance * min_distance);
	let w = strength * alpha * mass / d2;
	(finite_or_zero(dx * w), finite_or_zero(dy * w))
}

/// Rest length of a link, shortened by a positive weight.
fn rest_length(link: &LinkState, config: &SimulationConfig) -> f64 {
	match link.link.weight {
		Some(w) if w > 0.0 && w.is_finite() => config.rest_distance / w,
		_ => config.rest_distance,
	}
}

/// Adds every link's spring force to `forces`.
pub(crate) fn accumulate_springs(
	nodes: &[Node],
	links: &[LinkState],
	config: &SimulationConfig,
	alpha: f64,
	forces: &mut [(f64, f64)],
) {
	for link in links {
		let (s, t) = (link.source, link.target);
		if s == t || s >= nodes.len() || t >= nodes.len() {
			continue;
		}
		let mut target = nodes[t].position();
		if target == nodes[s].position() {
			let (jx, jy) = jiggle(s.min(t), s.max(t));
			let sign = if s < t { 1.0 } else { -1.0 };
			target = (target.0 + sign * jx, target.1 + sign * jy);
		}
		let f = spring_force(
			nodes[s].position(),
			target,
			rest_length(link, config),
			config.spring_constant,
			alpha,
		);
		forces[s].0 += f.0;
		forces[s].1 += f.1;
		forces[t].0 -= f.0;
		forces[t].1 -= f.1;
	}
}

/// Adds pairwise repulsion to `forces` using the configured strategy.
pub(crate) fn accumulate_repulsion(
	nodes: &[Node],
	config: &SimulationConfig,
	alpha: f64,
	forces: &mut [(f64, f64)],
) {
	let strength = config.charge_strength;
	let floor = config.min_distance;
	match config.repulsion {
		Repulsion::AllPairs => {
			for i in 0..nodes.len() {
				for j in (i + 1)..nodes.len() {
					let mut from = nodes[j].position();
					if from == nodes[i].position() {
						let (jx, jy) = jiggle(i, j);
						from = (from.0 + jx, from.1 + jy);
					}
					let f = charge_force(nodes[i].position(), from, 1.0, strength, alpha, floor);
					forces[i].0 += f.0;
					forces[i].1 += f.1;
					forces[j].0 -= f.0;
					forces[j].1 -= f.1;
				}
			}
		}
		Repulsion::BarnesHut { theta } => {
			let tree = QuadTree::build(nodes.iter().map(Node::position).collect());
			for (i, force) in forces.iter_mut().enumerate().take(nodes.len()) {
				let f = tree.force_on(i, theta, |other, at, from, mass| {
					let from = if other != usize::MAX && from == at {
						let (jx, jy) = jiggle(i.min(other), i.max(other));
						let sign = if i < other { 1.0 } else { -1.0 };
						(from.0 + sign * jx, from.1 + sign * jy)
					} else {
						from
					};
					charge_force(at, from, mass, strength, alpha, floor)
				});
				force.0 += f.0;
				force.1 += f.1;
			}
		}
	}
}

/// Pulls the centroid of all nodes towards `center`. Every node receives
/// the same share of the correction.
pub(crate) fn accumulate_centering(
	nodes: &[Node],
	center: (f64, f64),
	strength: f64,
	forces: &mut [(f64, f64)],
) {
	if nodes.is_empty() || strength == 0.0 {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let shift = (
		finite_or_zero((center.0 - sx / n) * strength),
		finite_or_zero((center.1 - sy / n) * strength),
	);
	for f in forces.iter_mut() {
		f.0 += shift.0;
		f.1 += shift.1;
	}
}

/// Advances node positions and velocities.
pub(crate) struct Simulator {
	config: SimulationConfig,
	center: (f64, f64),
	state: SimulationState,
	forces: Vec<(f64, f64)>,
}

impl Simulator {
	pub fn new(config: SimulationConfig, center: (f64, f64)) -> Self {
		let state = SimulationState::new(&config);
		Self {
			config,
			center,
			state,
			forces: Vec::new(),
		}
	}

	pub fn state(&self) -> &SimulationState {
		&self.state
	}

	pub fn state_mut(&mut self) -> &mut SimulationState {
		&mut self.state
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Moves the centering target, e.g. after a viewport resize.
	pub fn set_center(&mut self, center: (f64, f64)) {
		self.center = center;
	}

	/// Runs one tick if the simulation is running. Returns the phase after
	/// the tick.
	pub fn step(&mut self, nodes: &mut [Node], links: &[LinkState]) -> Phase {
		if !self.state.is_running() {
			return Phase::Settled;
		}
		let alpha = self.state.alpha;

		self.forces.clear();
		self.forces.resize(nodes.len(), (0.0, 0.0));
		accumulate_springs(nodes, links, &self.config, alpha, &mut self.forces);
		accumulate_repulsion(nodes, &self.config, alpha, &mut self.forces);
		accumulate_centering(
			nodes,
			self.center,
			self.config.centering_strength,
			&mut self.forces,
		);

		let dt = self.config.time_step;
		let decay = self.state.velocity_decay;
		for (node, force) in nodes.iter_mut().zip(&self.forces) {
			integrate(node, *force, dt, decay);
		}

		self.state.cool();
		if self.state.phase() == Phase::Settled {
			debug!(
				"simulation settled after {} ticks (alpha {:.4})",
				self.state.ticks(),
				self.state.alpha
			);
		}
		self.state.phase()
	}
}

fn integrate(node: &mut Node, force: (f64, f64), dt: f64, decay: f64) {
	if node.is_pinned() {
		node.x = node.fx.unwrap_or(node.x);
		node.y = node.fy.unwrap_or(node.y);
		node.vx = 0.0;
		node.vy = 0.0;
		return;
	}
	let vx = node.vx + finite_or_zero(force.0) * dt;
	let vy = node.vy + finite_or_zero(force.1) * dt;
	let (x, y) = (node.x + vx * dt, node.y + vy * dt);
	if x.is_finite() && y.is_finite() {
		node.x = x;
		node.y = y;
		node.vx = finite_or_zero(vx * decay);
		node.vy = finite_or_zero(vy * decay);
	} else {
		trace!("node {}: non-finite step discarded", node.id);
		node.vx = 0.0;
		node.vy = 0.0;
	}
}
