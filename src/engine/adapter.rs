//! Render target capability.
//!
//! The engine hands a [`RenderFrame`] to the adapter once per frame; the
//! adapter draws it however it likes. Pointer input travels the other way:
//! the host translates raw pointer positions with the adapter and feeds the
//! result to [`GraphEngine::pointer`](super::GraphEngine::pointer).

use super::interaction::{HoverGlow, SelectionState};
use super::simulation::Phase;
use super::types::{LinkState, Node};
use super::view::ViewTransform;

/// Read-only snapshot of everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
	/// Live nodes in draw order.
	pub nodes: &'a [Node],
	/// Endpoints index into `nodes`.
	pub links: &'a [LinkState],
	pub view: &'a ViewTransform,
	pub selection: &'a SelectionState,
	/// Smoothed hover intensities.
	pub glow: &'a HoverGlow,
	pub phase: Phase,
	/// Simulation temperature.
	pub alpha: f64,
	/// Seconds of animation time since the engine started.
	pub time: f64,
}

impl RenderFrame<'_> {
	/// Endpoint nodes of a link.
	pub fn endpoints(&self, link: &LinkState) -> (&Node, &Node) {
		(&self.nodes[link.source], &self.nodes[link.target])
	}
}

/// Something that can draw graph frames and translate pointer positions.
pub trait RenderAdapter {
	/// Called before any drawing, e.g. to clear and apply the view transform.
	fn begin_frame(&mut self, _frame: &RenderFrame<'_>) {}

	/// Draws every link. Runs before [`draw_nodes`](Self::draw_nodes).
	fn draw_links(&mut self, frame: &RenderFrame<'_>);

	/// Draws every node on top of the links.
	fn draw_nodes(&mut self, frame: &RenderFrame<'_>);

	/// Called after all drawing, e.g. to restore context state.
	fn end_frame(&mut self, _frame: &RenderFrame<'_>) {}

	/// Translates a raw pointer position (e.g. client coordinates) into
	/// the screen space the view transform maps from.
	fn pointer_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x, y)
	}

	/// Raw pointer position to simulation coordinates.
	fn map_pointer_to_model_space(&self, x: f64, y: f64, view: &ViewTransform) -> (f64, f64) {
		let (sx, sy) = self.pointer_to_screen(x, y);
		view.screen_to_model(sx, sy)
	}
}
