//! Headless incremental force-directed graph engine.
//!
//! [`GraphEngine`] owns the graph model, the physics simulation, the view
//! transform and the interaction state. The host drives it cooperatively,
//! calling [`GraphEngine::tick`] (or [`GraphEngine::frame`] with a
//! [`RenderAdapter`]) once per display frame. Each tick:
//!
//! 1. merges staged data mutations into live state,
//! 2. applies queued pointer events,
//! 3. runs one simulation step while the simulation is running,
//! 4. advances hover glow animation.
//!
//! Nothing here touches the DOM, so the whole engine is testable natively.

mod adapter;
mod config;
mod dto;
/// Entity-state maps to graph data.
pub mod entities;
mod error;
mod events;
mod interaction;
mod model;
mod quadtree;
mod reconcile;
mod simulation;
mod types;
mod view;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub use adapter::{RenderAdapter, RenderFrame};
pub use config::{EngineConfig, InteractionConfig, NodeSizing, Repulsion, SimulationConfig, ViewConfig};
pub use dto::{GraphData, LinkDto, NodeDto};
pub use error::{EngineError, Result, StateError, ValidationError};
pub use events::{GraphEvent, ListenerId};
pub use interaction::{HoverGlow, PointerEvent, PointerState, SelectionState};
pub use model::GraphModel;
pub use reconcile::ReconcileReport;
pub use simulation::{Phase, SimulationState};
pub use types::{Link, LinkState, Mark, Metadata, Node, NodeKind, NodeSpec};
pub use view::ViewTransform;

use events::EventBus;
use interaction::{InteractionController, Scene};
use reconcile::Reconciler;
use simulation::Simulator;

/// Animation time per tick, in seconds.
pub const FRAME_SECONDS: f64 = 0.016;

/// One graph visualization instance.
pub struct GraphEngine {
	config: EngineConfig,
	model: GraphModel,
	simulator: Simulator,
	view: ViewTransform,
	interaction: InteractionController,
	events: EventBus,
	rng: SmallRng,
	time: f64,
	destroyed: bool,
}

impl Default for GraphEngine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

impl GraphEngine {
	/// Creates an empty engine. Nothing is drawn until data is set.
	pub fn new(config: EngineConfig) -> Self {
		info!(
			"graph engine: {}x{} viewport, {:?} repulsion",
			config.width, config.height, config.simulation.repulsion
		);
		Self {
			model: GraphModel::new(),
			simulator: Simulator::new(config.simulation.clone(), config.center()),
			view: ViewTransform::new(&config.view),
			interaction: InteractionController::new(config.interaction.clone()),
			events: EventBus::new(),
			rng: SmallRng::seed_from_u64(config.seed),
			time: 0.0,
			destroyed: false,
			config,
		}
	}

	fn live(&self, operation: &'static str) -> Result<(), StateError> {
		if self.destroyed {
			Err(StateError::Destroyed { operation })
		} else {
			Ok(())
		}
	}

	fn dispatch(&mut self, events: Vec<GraphEvent>) {
		self.events.emit_all(events);
	}

	// Data

	/// Validates and stages a full dataset replacement. Applied at the next
	/// tick or [`reconcile`](Self::reconcile).
	pub fn set_data(&mut self, nodes: Vec<NodeSpec>, links: Vec<Link>) -> Result<()> {
		self.live("set_data")?;
		let (n, l) = (nodes.len(), links.len());
		self.model.set_data(nodes, links)?;
		debug!("staged dataset: {n} nodes, {l} links");
		Ok(())
	}

	/// [`set_data`](Self::set_data) from the wire format.
	pub fn set_graph_data(&mut self, data: GraphData) -> Result<()> {
		let (nodes, links) = data.into_specs();
		self.set_data(nodes, links)
	}

	/// Validates and stages one node.
	pub fn add_node(&mut self, node: NodeSpec) -> Result<()> {
		self.live("add_node")?;
		Ok(self.model.add_node(node)?)
	}

	/// Validates and stages one link. Both endpoints must be declared.
	pub fn add_link(&mut self, link: Link) -> Result<()> {
		self.live("add_link")?;
		Ok(self.model.add_link(link)?)
	}

	/// Stages removal of a node and every link touching it.
	pub fn remove_node(&mut self, id: &str) -> Result<()> {
		self.live("remove_node")?;
		Ok(self.model.remove_node(id)?)
	}

	/// Stages removal of the link `source -> target`.
	pub fn remove_link(&mut self, source: &str, target: &str) -> Result<()> {
		self.live("remove_link")?;
		Ok(self.model.remove_link(source, target)?)
	}

	/// Applies staged mutations now instead of at the next tick.
	pub fn reconcile(&mut self) -> Result<ReconcileReport> {
		self.live("reconcile")?;
		let mut out = Vec::new();
		let report = self.reconcile_into(&mut out);
		self.dispatch(out);
		Ok(report)
	}

	fn reconcile_into(&mut self, out: &mut Vec<GraphEvent>) -> ReconcileReport {
		if !self.model.has_pending() {
			return ReconcileReport::default();
		}
		let reconciler = Reconciler::new(
			&self.config.sizing,
			&self.config.simulation,
			self.simulator.center(),
		);
		let report = reconciler.apply(&mut self.model, &mut self.rng);
		if report.needs_reheat() {
			self.simulator
				.state_mut()
				.reheat(self.config.simulation.reheat_alpha);
		}
		self.interaction
			.sync_with_model(&mut self.model, self.simulator.state_mut(), out);
		report
	}

	// Interaction

	/// Queues a pointer event (screen coordinates) for the next tick.
	pub fn pointer(&mut self, event: PointerEvent) -> Result<()> {
		self.live("pointer")?;
		self.interaction.push(event);
		Ok(())
	}

	/// Selects a live node, as if it had been clicked.
	pub fn select(&mut self, id: &str) -> Result<()> {
		self.live("select")?;
		if !self.model.contains(id) {
			return Err(ValidationError::UnknownNode(id.to_string()).into());
		}
		let mut out = Vec::new();
		self.interaction.select(id, &mut self.model, &mut out);
		self.dispatch(out);
		Ok(())
	}

	/// Drops the selection and resets every mark to [`Mark::Normal`].
	pub fn clear_selection(&mut self) -> Result<()> {
		self.live("clear_selection")?;
		let mut out = Vec::new();
		self.interaction.clear_selection(&mut self.model, &mut out);
		self.dispatch(out);
		Ok(())
	}

	/// Pins a live node at `(x, y)` (model space) until
	/// [`release_node`](Self::release_node). Survives drags.
	pub fn fix_node(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
		self.live("fix_node")?;
		for (field, v) in [("x", x), ("y", y)] {
			if !v.is_finite() {
				return Err(ValidationError::NonFinite {
					id: id.to_string(),
					field,
				}
				.into());
			}
		}
		let node = self
			.model
			.node_mut(id)
			.ok_or_else(|| ValidationError::UnknownNode(id.to_string()))?;
		node.fixed = true;
		node.pin(x, y);
		node.x = x;
		node.y = y;
		node.vx = 0.0;
		node.vy = 0.0;
		self.simulator
			.state_mut()
			.reheat(self.config.simulation.drag_alpha_target);
		Ok(())
	}

	/// Undoes [`fix_node`](Self::fix_node). A node being dragged stays
	/// pinned until it is dropped.
	pub fn release_node(&mut self, id: &str) -> Result<()> {
		self.live("release_node")?;
		let dragging = self.interaction.dragging() == Some(id);
		let node = self
			.model
			.node_mut(id)
			.ok_or_else(|| ValidationError::UnknownNode(id.to_string()))?;
		node.fixed = false;
		if !dragging {
			node.unpin();
		}
		self.simulator
			.state_mut()
			.reheat(self.config.simulation.drag_alpha_target);
		Ok(())
	}

	// View

	fn zoom_with(&mut self, operation: &'static str, f: impl FnOnce(&mut ViewTransform) -> bool) -> Result<f64> {
		self.live(operation)?;
		if f(&mut self.view) {
			let scale = self.view.scale();
			self.dispatch(vec![GraphEvent::ZoomChanged(scale)]);
		}
		Ok(self.view.scale())
	}

	/// Multiplies the scale by `zoom_factor`. Returns the new scale.
	pub fn zoom_in(&mut self) -> Result<f64> {
		self.zoom_with("zoom_in", ViewTransform::zoom_in)
	}

	/// Divides the scale by `zoom_factor`. Returns the new scale.
	pub fn zoom_out(&mut self) -> Result<f64> {
		self.zoom_with("zoom_out", ViewTransform::zoom_out)
	}

	/// Pan (0, 0), scale 1.
	pub fn reset_zoom(&mut self) -> Result<f64> {
		self.zoom_with("reset_zoom", ViewTransform::reset)
	}

	/// Zooms about a screen point.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) -> Result<f64> {
		self.zoom_with("zoom_at", |view| view.zoom_at(x, y, factor))
	}

	/// Sets the screen-space translation.
	pub fn set_pan(&mut self, x: f64, y: f64) -> Result<()> {
		self.live("set_pan")?;
		self.view.set_pan(x, y);
		Ok(())
	}

	/// Moves the centering target to the middle of a new viewport.
	pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
		self.live("resize")?;
		if width.is_finite() && height.is_finite() {
			self.config.width = width;
			self.config.height = height;
			self.simulator.set_center(self.config.center());
		}
		Ok(())
	}

	// Simulation

	/// Reheats to full temperature and resumes ticking.
	pub fn refresh(&mut self) -> Result<()> {
		self.live("refresh")?;
		self.simulator.state_mut().reheat(1.0);
		Ok(())
	}

	/// Forces the simulation to settle. Pointer input still applies.
	pub fn stop(&mut self) -> Result<()> {
		self.live("stop")?;
		self.simulator.state_mut().stop();
		Ok(())
	}

	/// One frame's worth of work; see the module docs for the order.
	pub fn tick(&mut self) -> Result<Phase> {
		self.tick_with(FRAME_SECONDS)
	}

	/// [`tick`](Self::tick) with an explicit animation time step.
	pub fn tick_with(&mut self, dt: f64) -> Result<Phase> {
		self.live("tick")?;
		let mut out = Vec::new();
		self.reconcile_into(&mut out);

		if self.interaction.has_pending() {
			let mut scene = Scene {
				model: &mut self.model,
				view: &mut self.view,
				sim: self.simulator.state_mut(),
				drag_alpha_target: self.config.simulation.drag_alpha_target,
				wheel_zoom_factor: self.config.view.wheel_zoom_factor,
			};
			self.interaction.apply_pending(&mut scene, &mut out);
		}

		let phase = self.simulator.step(&mut self.model.nodes, &self.model.links);
		self.interaction.animate(dt);
		self.time += dt;
		self.dispatch(out);
		Ok(phase)
	}

	/// Ticks until the simulation settles or `max_ticks` elapse. Returns the
	/// number of ticks run.
	pub fn run_until_settled(&mut self, max_ticks: u64) -> Result<u64> {
		let mut ticks = 0;
		while ticks < max_ticks {
			ticks += 1;
			if self.tick()? == Phase::Settled {
				break;
			}
		}
		Ok(ticks)
	}

	/// Ticks once and draws the result.
	pub fn frame(&mut self, adapter: &mut impl RenderAdapter) -> Result<Phase> {
		let phase = self.tick()?;
		self.draw(adapter)?;
		Ok(phase)
	}

	/// Draws the current state without ticking. Fails once destroyed, so a
	/// late animation callback surfaces instead of drawing nothing.
	pub fn draw(&self, adapter: &mut impl RenderAdapter) -> Result<()> {
		let frame = self.render_frame()?;
		adapter.begin_frame(&frame);
		adapter.draw_links(&frame);
		adapter.draw_nodes(&frame);
		adapter.end_frame(&frame);
		Ok(())
	}

	/// Snapshot handed to a [`RenderAdapter`].
	pub fn render_frame(&self) -> Result<RenderFrame<'_>> {
		self.live("render_frame")?;
		Ok(RenderFrame {
			nodes: self.model.nodes(),
			links: self.model.links(),
			view: &self.view,
			selection: self.interaction.selection(),
			glow: self.interaction.glow(),
			phase: self.simulator.state().phase(),
			alpha: self.simulator.state().alpha,
			time: self.time,
		})
	}

	// Events

	/// Registers a listener for every [`GraphEvent`].
	pub fn subscribe(&mut self, listener: impl FnMut(&GraphEvent) + 'static) -> Result<ListenerId> {
		self.live("subscribe")?;
		Ok(self.events.subscribe(listener))
	}

	/// Removes a listener. `Ok(false)` if it was already gone.
	pub fn unsubscribe(&mut self, id: ListenerId) -> Result<bool> {
		self.live("unsubscribe")?;
		Ok(self.events.unsubscribe(id))
	}

	/// Called with the id of each newly selected node.
	pub fn on_node_selected(&mut self, f: impl FnMut(&str) + 'static) -> Result<ListenerId> {
		self.live("on_node_selected")?;
		Ok(self.events.on_node_selected(f))
	}

	/// Called when the selection is dropped, including when the selected node exits.
	pub fn on_selection_cleared(&mut self, f: impl FnMut() + 'static) -> Result<ListenerId> {
		self.live("on_selection_cleared")?;
		Ok(self.events.on_selection_cleared(f))
	}

	/// Called when the node under the pointer changes; `None` when it leaves every node.
	pub fn on_node_hovered(&mut self, f: impl FnMut(Option<&str>) + 'static) -> Result<ListenerId> {
		self.live("on_node_hovered")?;
		Ok(self.events.on_node_hovered(f))
	}

	/// Called with the new scale whenever it actually changes.
	pub fn on_zoom_changed(&mut self, f: impl FnMut(f64) + 'static) -> Result<ListenerId> {
		self.live("on_zoom_changed")?;
		Ok(self.events.on_zoom_changed(f))
	}

	// Lifecycle

	/// Stops the simulation and drops all state. Idempotent. Every mutating
	/// call afterwards fails with [`StateError::Destroyed`].
	pub fn destroy(&mut self) {
		if self.destroyed {
			return;
		}
		self.simulator.state_mut().stop();
		self.model.clear();
		self.interaction.reset();
		self.events.clear();
		self.destroyed = true;
		info!("graph engine destroyed");
	}

	/// Whether [`destroy`](Self::destroy) has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	// Reads

	/// Configuration, with the current viewport size.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Live graph state.
	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	/// Live nodes in draw order.
	pub fn nodes(&self) -> &[Node] {
		self.model.nodes()
	}

	/// Live links.
	pub fn links(&self) -> &[LinkState] {
		self.model.links()
	}

	/// Live node by id. Staged nodes are not visible until reconciled.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.model.node(id)
	}

	/// Current pan and zoom.
	pub fn view(&self) -> &ViewTransform {
		&self.view
	}

	/// Temperature and cooling parameters.
	pub fn simulation(&self) -> &SimulationState {
		self.simulator.state()
	}

	/// Whether the layout is still moving.
	pub fn phase(&self) -> Phase {
		self.simulator.state().phase()
	}

	/// Selected and hovered node ids.
	pub fn selection(&self) -> &SelectionState {
		self.interaction.selection()
	}

	/// Idle, hovering or dragging.
	pub fn pointer_state(&self) -> &PointerState {
		self.interaction.state()
	}

	/// Topmost live node under a screen point.
	pub fn node_at(&self, x: f64, y: f64) -> Result<Option<&Node>> {
		self.live("node_at")?;
		Ok(self
			.interaction
			.hit_test(x, y, &self.model, &self.view)
			.and_then(|id| self.model.node(&id)))
	}
}
