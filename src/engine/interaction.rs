//! Pointer-driven drag, hover, selection and pan.
//!
//! Pointer events carry screen coordinates. They are queued as they arrive
//! and applied at the start of the next tick, mapped through the view
//! transform current at that moment.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use super::config::InteractionConfig;
use super::events::GraphEvent;
use super::model::GraphModel;
use super::simulation::SimulationState;
use super::types::{Mark, Node};
use super::view::ViewTransform;

/// Raw pointer input in screen (canvas pixel) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	/// Button pressed.
	Down { x: f64, y: f64 },
	Move { x: f64, y: f64 },
	/// Button released.
	Up { x: f64, y: f64 },
	/// Pointer left the canvas.
	Leave,
	/// Positive `delta_y` zooms out, negative zooms in, one notch per event.
	Wheel { x: f64, y: f64, delta_y: f64 },
}

/// Pointer state machine. Selection is tracked separately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PointerState {
	/// Pointer over empty space or outside the canvas.
	#[default]
	Idle,
	Hovering(String),
	Dragging(String),
}

/// Persistent selection plus the node under the pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	pub selected: Option<String>,
	pub hovered: Option<String>,
}

#[derive(Clone, Debug)]
struct DragGesture {
	down: (f64, f64),
}

#[derive(Clone, Debug)]
struct PanGesture {
	down: (f64, f64),
	pan: (f64, f64),
}

/// Everything a pointer event may touch.
pub(crate) struct Scene<'a> {
	pub model: &'a mut GraphModel,
	pub view: &'a mut ViewTransform,
	pub sim: &'a mut SimulationState,
	/// Alpha target held while dragging.
	pub drag_alpha_target: f64,
	/// Scale multiplier per wheel notch.
	pub wheel_zoom_factor: f64,
}

/// Pointer state machine and selection owner.
#[derive(Clone, Debug, Default)]
pub(crate) struct InteractionController {
	config: InteractionConfig,
	state: PointerState,
	selection: SelectionState,
	queue: VecDeque<PointerEvent>,
	drag: Option<DragGesture>,
	pan: Option<PanGesture>,
	glow: HoverGlow,
}

impl InteractionController {
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn state(&self) -> &PointerState {
		&self.state
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	pub fn glow(&self) -> &HoverGlow {
		&self.glow
	}

	/// Id of the node currently being dragged.
	pub fn dragging(&self) -> Option<&str> {
		match &self.state {
			PointerState::Dragging(id) => Some(id),
			_ => None,
		}
	}

	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	/// Queues an event for the next tick.
	pub fn push(&mut self, event: PointerEvent) {
		self.queue.push_back(event);
	}

	pub fn has_pending(&self) -> bool {
		!self.queue.is_empty()
	}

	/// Applies every queued pointer event in arrival order.
	pub fn apply_pending(&mut self, scene: &mut Scene<'_>, out: &mut Vec<GraphEvent>) {
		while let Some(event) = self.queue.pop_front() {
			self.apply(event, scene, out);
		}
	}

	fn apply(&mut self, event: PointerEvent, scene: &mut Scene<'_>, out: &mut Vec<GraphEvent>) {
		match event {
			PointerEvent::Down { x, y } => self.down(x, y, scene),
			PointerEvent::Move { x, y } => self.moved(x, y, scene, out),
			PointerEvent::Up { x, y } => self.up(x, y, scene, out),
			PointerEvent::Leave => {
				self.release(None, scene, out);
				self.pan = None;
				self.set_hover(None, scene.model, out);
				self.state = PointerState::Idle;
			}
			PointerEvent::Wheel { x, y, delta_y } => {
				if delta_y == 0.0 || !delta_y.is_finite() {
					return;
				}
				let factor = if delta_y > 0.0 {
					1.0 / scene.wheel_zoom_factor
				} else {
					scene.wheel_zoom_factor
				};
				if scene.view.zoom_at(x, y, factor) {
					out.push(GraphEvent::ZoomChanged(scene.view.scale()));
				}
			}
		}
	}

	fn down(&mut self, x: f64, y: f64, scene: &mut Scene<'_>) {
		if self.dragging().is_some() {
			return;
		}
		match self.hit_test(x, y, scene.model, scene.view) {
			Some(id) => {
				if let Some(node) = scene.model.node_mut(&id) {
					let (nx, ny) = node.position();
					node.pin(nx, ny);
				}
				scene.sim.set_alpha_target(scene.drag_alpha_target);
				debug!("drag start: {id}");
				self.drag = Some(DragGesture { down: (x, y) });
				self.state = PointerState::Dragging(id);
			}
			None => {
				self.pan = Some(PanGesture {
					down: (x, y),
					pan: (scene.view.pan_x, scene.view.pan_y),
				});
			}
		}
	}

	fn moved(&mut self, x: f64, y: f64, scene: &mut Scene<'_>, out: &mut Vec<GraphEvent>) {
		if let PointerState::Dragging(id) = &self.state {
			let (mx, my) = scene.view.screen_to_model(x, y);
			if let Some(node) = scene.model.node_mut(id) {
				if mx.is_finite() && my.is_finite() {
					node.pin(mx, my);
				}
			}
			return;
		}
		if let Some(pan) = &self.pan {
			scene
				.view
				.set_pan(pan.pan.0 + (x - pan.down.0), pan.pan.1 + (y - pan.down.1));
			return;
		}
		let hit = self.hit_test(x, y, scene.model, scene.view);
		self.set_hover(hit, scene.model, out);
	}

	fn up(&mut self, x: f64, y: f64, scene: &mut Scene<'_>, out: &mut Vec<GraphEvent>) {
		self.pan = None;
		self.release(Some((x, y)), scene, out);
		let hit = self.hit_test(x, y, scene.model, scene.view);
		self.set_hover(hit, scene.model, out);
	}

	/// Ends a drag. `at` is the release point; `None` cancels without a click.
	fn release(&mut self, at: Option<(f64, f64)>, scene: &mut Scene<'_>, out: &mut Vec<GraphEvent>) {
		let Some(id) = self.dragging().map(str::to_string) else {
			return;
		};
		self.state = PointerState::Idle;
		let gesture = self.drag.take();
		if let Some(node) = scene.model.node_mut(&id) {
			if node.fixed {
				let (px, py) = (node.fx.unwrap_or(node.x), node.fy.unwrap_or(node.y));
				node.pin(px, py);
			} else {
				node.unpin();
			}
		}
		scene.sim.set_alpha_target(0.0);
		debug!("drag end: {id}");

		let (Some((x, y)), Some(gesture)) = (at, gesture) else {
			return;
		};
		let travel = (x - gesture.down.0).hypot(y - gesture.down.1);
		if travel < self.config.click_threshold && scene.model.contains(&id) {
			self.select(&id, scene.model, out);
		}
	}

	/// Topmost node whose hit area contains the screen point, in the order
	/// nodes are drawn: raised nodes (see [`HoverGlow::raises`]) over the
	/// rest, later nodes over earlier ones.
	pub fn hit_test(&self, x: f64, y: f64, model: &GraphModel, view: &ViewTransform) -> Option<String> {
		let (mx, my) = view.screen_to_model(x, y);
		let slop = self.config.hit_slop / view.scale();
		let hit = |n: &&Node| (n.x - mx).hypot(n.y - my) <= n.radius + slop;
		let nodes = model.nodes();
		nodes
			.iter()
			.rev()
			.filter(|n| self.glow.raises(n))
			.find(hit)
			.or_else(|| nodes.iter().rev().filter(|n| !self.glow.raises(n)).find(hit))
			.map(|n| n.id.clone())
	}

	fn set_hover(&mut self, id: Option<String>, model: &GraphModel, out: &mut Vec<GraphEvent>) {
		if self.dragging().is_none() {
			self.state = match &id {
				Some(id) => PointerState::Hovering(id.clone()),
				None => PointerState::Idle,
			};
		}
		if self.selection.hovered == id {
			return;
		}
		self.glow.set_hover(id.as_deref(), model);
		self.selection.hovered = id.clone();
		out.push(GraphEvent::NodeHovered(id));
	}

	/// Selects `id` and recomputes highlight marks. The caller checks the id
	/// exists.
	pub fn select(&mut self, id: &str, model: &mut GraphModel, out: &mut Vec<GraphEvent>) {
		self.selection.selected = Some(id.to_string());
		apply_marks(model, Some(id));
		out.push(GraphEvent::NodeSelected(id.to_string()));
	}

	pub fn clear_selection(&mut self, model: &mut GraphModel, out: &mut Vec<GraphEvent>) {
		if self.selection.selected.take().is_some() {
			apply_marks(model, None);
			out.push(GraphEvent::SelectionCleared);
		}
	}

	/// Reconciles interaction state with the live node set after data
	/// changed: forgets nodes that exited and recomputes marks.
	pub fn sync_with_model(
		&mut self,
		model: &mut GraphModel,
		sim: &mut SimulationState,
		out: &mut Vec<GraphEvent>,
	) {
		let gone = |id: Option<&str>| id.is_some_and(|id| !model.contains(id));

		if gone(self.dragging()) {
			debug!("dragged node exited, ending drag");
			self.state = PointerState::Idle;
			self.drag = None;
			sim.set_alpha_target(0.0);
		}
		if gone(self.selection.hovered.as_deref()) {
			self.set_hover(None, model, out);
		}
		if gone(self.selection.selected.as_deref()) {
			debug!("selected node exited, clearing selection");
			self.clear_selection(model, out);
		} else {
			let selected = self.selection.selected.clone();
			apply_marks(model, selected.as_deref());
		}
		self.glow.retain_live(model);
	}

	/// Advances hover glow animation by `dt` seconds.
	pub fn animate(&mut self, dt: f64) {
		self.glow.tick(dt);
	}

	pub(crate) fn reset(&mut self) {
		*self = Self::new(self.config.clone());
	}
}

/// Recomputes highlight marks for `selected`. `None` resets everything to
/// [`Mark::Normal`].
pub(crate) fn apply_marks(model: &mut GraphModel, selected: Option<&str>) {
	let Some(selected) = selected.and_then(|id| model.index_of(id)) else {
		for node in &mut model.nodes {
			node.mark = Mark::Normal;
		}
		for link in &mut model.links {
			link.mark = Mark::Normal;
		}
		return;
	};

	let mut related = HashSet::new();
	for link in &mut model.links {
		if link.source == selected || link.target == selected {
			link.mark = Mark::Related;
			related.insert(link.source);
			related.insert(link.target);
		} else {
			link.mark = Mark::Dimmed;
		}
	}
	for (i, node) in model.nodes.iter_mut().enumerate() {
		node.mark = if i == selected {
			Mark::Selected
		} else if related.contains(&i) {
			Mark::Related
		} else {
			Mark::Dimmed
		};
	}
}

/// Minimum time (seconds) a glow is held before it may fade out, so
/// skimming the edge of a hit area does not flicker.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Smoothed per-node hover intensity for the renderer.
///
/// The hovered node and its neighbours fade towards 1 and everything else
/// towards 0 with exponential smoothing: `v += (target - v) * (1 - e^(-speed * dt))`.
#[derive(Clone, Debug, Default)]
pub struct HoverGlow {
	hovered: Option<String>,
	target: HashSet<String>,
	intensity: HashMap<String, f64>,
	ring: HashMap<String, f64>,
	hold: HashMap<String, f64>,
	max: f64,
}

impl HoverGlow {
	/// Retargets the glow at `id` and its neighbours.
	pub fn set_hover(&mut self, id: Option<&str>, model: &GraphModel) {
		if self.hovered.as_deref() == id {
			return;
		}
		self.hovered = id.map(str::to_string);
		self.target.clear();
		let Some(id) = id else {
			return;
		};
		self.target.insert(id.to_string());
		let nodes = model.nodes();
		for link in model.links() {
			let (s, t) = (&nodes[link.source].id, &nodes[link.target].id);
			if s == id {
				self.target.insert(t.clone());
			} else if t == id {
				self.target.insert(s.clone());
			}
		}
		for id in &self.target {
			self.hold.insert(id.clone(), MIN_HOLD_TIME);
		}
	}

	/// Advances the fades by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for id in &self.target {
			let v = self.intensity.entry(id.clone()).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}
		if let Some(id) = &self.hovered {
			let v = self.ring.entry(id.clone()).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}

		let target = &self.target;
		self.hold.retain(|id, timer| {
			if target.contains(id) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let hold = &self.hold;
		let mut max: f64 = 0.0;
		self.intensity.retain(|id, v| {
			if !target.contains(id) && hold.get(id).copied().unwrap_or(0.0) <= 0.0 {
				*v *= fade_out;
			}
			max = max.max(*v);
			target.contains(id) || *v > 0.005
		});
		let hovered = self.hovered.as_deref();
		self.ring.retain(|id, v| {
			if hovered == Some(id.as_str()) {
				return true;
			}
			if hold.get(id).copied().unwrap_or(0.0) <= 0.0 {
				*v *= fade_out;
			}
			*v > 0.005
		});
		self.max = max;
	}

	/// Whether `node` is drawn above the rest: selected, related or glowing.
	pub fn raises(&self, node: &Node) -> bool {
		matches!(node.mark, Mark::Selected | Mark::Related) || self.node_intensity(&node.id) > 0.001
	}

	/// Glow of a node, from 0 to 1.
	pub fn node_intensity(&self, id: &str) -> f64 {
		self.intensity.get(id).copied().unwrap_or(0.0)
	}

	/// Hover ring of a node, from 0 to 1. Only the hovered node itself gets one.
	pub fn ring_intensity(&self, id: &str) -> f64 {
		self.ring.get(id).copied().unwrap_or(0.0)
	}

	/// Geometric mean of the endpoint intensities.
	pub fn edge_intensity(&self, a: &str, b: &str) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	/// Largest node glow, as of the last tick.
	pub fn max_intensity(&self) -> f64 {
		self.max
	}

	fn retain_live(&mut self, model: &GraphModel) {
		self.target.retain(|id| model.contains(id));
		self.intensity.retain(|id, _| model.contains(id));
		self.ring.retain(|id, _| model.contains(id));
		self.hold.retain(|id, _| model.contains(id));
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::engine::config::{NodeSizing, SimulationConfig, ViewConfig};
	use crate::engine::reconcile::Reconciler;
	use crate::engine::types::{Link, NodeKind, NodeSpec};

	/// A - B, C isolated; A at (0, 0), B at (100, 0), C at (0, 100).
	fn abc() -> GraphModel {
		let mut model = GraphModel::new();
		model
			.set_data(
				["a", "b", "c"]
					.into_iter()
					.map(|id| NodeSpec::new(id, NodeKind::Entity).with_radius(10.0))
					.collect(),
				vec![Link::new("a", "b")],
			)
			.unwrap();
		let sizing = NodeSizing::default();
		let sim = SimulationConfig::default();
		Reconciler::new(&sizing, &sim, (0.0, 0.0)).apply(&mut model, &mut SmallRng::seed_from_u64(1));
		for (id, x, y) in [("a", 0.0, 0.0), ("b", 100.0, 0.0), ("c", 0.0, 100.0)] {
			let n = model.node_mut(id).unwrap();
			n.x = x;
			n.y = y;
		}
		model
	}

	fn mark(model: &GraphModel, id: &str) -> Mark {
		model.node(id).unwrap().mark
	}

	#[test]
	fn selecting_marks_neighbourhood() {
		let mut model = abc();
		let mut ctl = InteractionController::default();
		let mut out = Vec::new();
		ctl.select("a", &mut model, &mut out);

		assert_eq!(mark(&model, "a"), Mark::Selected);
		assert_eq!(mark(&model, "b"), Mark::Related);
		assert_eq!(mark(&model, "c"), Mark::Dimmed);
		assert_eq!(model.links()[0].mark, Mark::Related);
		assert_eq!(out, vec![GraphEvent::NodeSelected("a".into())]);

		ctl.clear_selection(&mut model, &mut out);
		assert!(model.nodes().iter().all(|n| n.mark == Mark::Normal));
		assert!(model.links().iter().all(|l| l.mark == Mark::Normal));
		assert_eq!(out.last(), Some(&GraphEvent::SelectionCleared));

		// An isolated node has no neighbourhood: everything else dims.
		ctl.select("c", &mut model, &mut out);
		assert_eq!(mark(&model, "c"), Mark::Selected);
		assert_eq!(mark(&model, "a"), Mark::Dimmed);
		assert_eq!(mark(&model, "b"), Mark::Dimmed);
		assert_eq!(model.links()[0].mark, Mark::Dimmed);
		assert!(model.nodes().iter().all(|n| n.mark != Mark::Related));
	}

	#[test]
	fn hit_test_prefers_nodes_drawn_on_top() {
		let mut model = abc();
		let view = ViewTransform::default();
		let mut ctl = InteractionController::default();
		let mut out = Vec::new();
		model.node_mut("b").unwrap().x = 5.0;

		// Unmarked, the later node in draw order wins the overlap.
		assert_eq!(ctl.hit_test(2.0, 0.0, &model, &view).as_deref(), Some("b"));

		ctl.select("c", &mut model, &mut out);
		// b and a are both dimmed now, so plain order still applies.
		assert_eq!(ctl.hit_test(2.0, 0.0, &model, &view).as_deref(), Some("b"));

		ctl.select("a", &mut model, &mut out);
		// a is selected and b related: both raised, later one wins.
		assert_eq!(ctl.hit_test(2.0, 0.0, &model, &view).as_deref(), Some("b"));

		// Drop the link so only the selection is raised.
		let mut lone = abc();
		lone.node_mut("b").unwrap().x = 5.0;
		lone.remove_link("a", "b").unwrap();
		let sizing = NodeSizing::default();
		let sim = SimulationConfig::default();
		Reconciler::new(&sizing, &sim, (0.0, 0.0)).apply(&mut lone, &mut SmallRng::seed_from_u64(3));
		ctl.select("a", &mut lone, &mut out);
		assert_eq!(ctl.hit_test(2.0, 0.0, &lone, &view).as_deref(), Some("a"));
	}

	#[test]
	fn click_without_travel_selects() {
		let mut model = abc();
		let mut view = ViewTransform::new(&ViewConfig::default());
		let mut sim = SimulationState::new(&SimulationConfig::default());
		let mut ctl = InteractionController::new(InteractionConfig::default());
		let mut out = Vec::new();
		let mut scene = Scene {
			model: &mut model,
			view: &mut view,
			sim: &mut sim,
			drag_alpha_target: 0.3,
			wheel_zoom_factor: 1.1,
		};

		ctl.push(PointerEvent::Down { x: 101.0, y: 1.0 });
		ctl.push(PointerEvent::Up { x: 102.0, y: 1.0 });
		ctl.apply_pending(&mut scene, &mut out);

		assert_eq!(ctl.selection().selected.as_deref(), Some("b"));
		assert!(out.contains(&GraphEvent::NodeSelected("b".into())));
		assert_eq!(scene.model.node("b").unwrap().fx, None);
		assert_eq!(scene.sim.alpha_target, 0.0);
	}

	#[test]
	fn long_drag_does_not_select() {
		let mut model = abc();
		let mut view = ViewTransform::default();
		let mut sim = SimulationState::new(&SimulationConfig::default());
		let mut ctl = InteractionController::default();
		let mut out = Vec::new();
		let mut scene = Scene {
			model: &mut model,
			view: &mut view,
			sim: &mut sim,
			drag_alpha_target: 0.3,
			wheel_zoom_factor: 1.1,
		};

		ctl.push(PointerEvent::Down { x: 0.0, y: 0.0 });
		ctl.push(PointerEvent::Move { x: 40.0, y: 40.0 });
		ctl.apply_pending(&mut scene, &mut out);
		assert_eq!(ctl.dragging(), Some("a"));
		assert_eq!(scene.sim.alpha_target, 0.3);
		let a = scene.model.node("a").unwrap();
		assert_eq!((a.fx, a.fy), (Some(40.0), Some(40.0)));

		ctl.push(PointerEvent::Up { x: 40.0, y: 40.0 });
		ctl.apply_pending(&mut scene, &mut out);
		assert_eq!(ctl.selection().selected, None);
		assert!(!scene.model.node("a").unwrap().is_pinned());
	}

	#[test]
	fn background_drag_pans_view() {
		let mut model = abc();
		let mut view = ViewTransform::default();
		let mut sim = SimulationState::new(&SimulationConfig::default());
		let mut ctl = InteractionController::default();
		let mut out = Vec::new();
		let mut scene = Scene {
			model: &mut model,
			view: &mut view,
			sim: &mut sim,
			drag_alpha_target: 0.3,
			wheel_zoom_factor: 1.1,
		};

		ctl.push(PointerEvent::Down { x: 300.0, y: 300.0 });
		ctl.push(PointerEvent::Move { x: 320.0, y: 290.0 });
		ctl.apply_pending(&mut scene, &mut out);
		assert!(ctl.is_panning());
		assert_eq!((scene.view.pan_x, scene.view.pan_y), (20.0, -10.0));

		ctl.push(PointerEvent::Leave);
		ctl.apply_pending(&mut scene, &mut out);
		assert!(!ctl.is_panning());
		assert_eq!(ctl.state(), &PointerState::Idle);
	}

	#[test]
	fn hover_transitions_emit_once() {
		let mut model = abc();
		let mut view = ViewTransform::default();
		let mut sim = SimulationState::new(&SimulationConfig::default());
		let mut ctl = InteractionController::default();
		let mut out = Vec::new();
		let mut scene = Scene {
			model: &mut model,
			view: &mut view,
			sim: &mut sim,
			drag_alpha_target: 0.3,
			wheel_zoom_factor: 1.1,
		};

		for (x, y) in [(2.0, 2.0), (3.0, 3.0), (50.0, 50.0)] {
			ctl.push(PointerEvent::Move { x, y });
		}
		ctl.apply_pending(&mut scene, &mut out);
		assert_eq!(
			out,
			vec![
				GraphEvent::NodeHovered(Some("a".into())),
				GraphEvent::NodeHovered(None),
			]
		);
		assert_eq!(ctl.state(), &PointerState::Idle);
	}

	#[test]
	fn exiting_selected_node_clears_selection() {
		let mut model = abc();
		let mut sim = SimulationState::new(&SimulationConfig::default());
		let mut ctl = InteractionController::default();
		let mut out = Vec::new();
		ctl.select("a", &mut model, &mut out);

		model.remove_node("a").unwrap();
		let sizing = NodeSizing::default();
		let cfg = SimulationConfig::default();
		Reconciler::new(&sizing, &cfg, (0.0, 0.0)).apply(&mut model, &mut SmallRng::seed_from_u64(2));
		ctl.sync_with_model(&mut model, &mut sim, &mut out);

		assert_eq!(ctl.selection().selected, None);
		assert_eq!(out.last(), Some(&GraphEvent::SelectionCleared));
		assert!(model.nodes().iter().all(|n| n.mark == Mark::Normal));
	}

	#[test]
	fn glow_fades_in_and_holds_before_fading_out() {
		let model = abc();
		let mut glow = HoverGlow::default();
		glow.set_hover(Some("a"), &model);
		for _ in 0..30 {
			glow.tick(0.016);
		}
		assert!(glow.node_intensity("a") > 0.9);
		assert!(glow.node_intensity("b") > 0.9);
		assert_eq!(glow.node_intensity("c"), 0.0);

		glow.set_hover(None, &model);
		glow.tick(0.05);
		let held = glow.node_intensity("a");
		assert!(held > 0.9, "faded during hold: {held}");
		for _ in 0..200 {
			glow.tick(0.016);
		}
		assert_eq!(glow.node_intensity("a"), 0.0);
		assert_eq!(glow.max_intensity(), 0.0);
	}
}
