//! Canvas rendering for the graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links, then arrow heads (world space)
//! 3. Hover glows, unmarked and dimmed nodes, then selected/related/hovered
//!    nodes on top
//! 4. Vignette (screen space)

use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use crate::engine::{Mark, Node, RenderAdapter, RenderFrame};

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

/// [`RenderAdapter`] drawing onto a 2D canvas context.
pub struct CanvasRenderer {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	/// Zoom-dependent sizing, re-evaluated each frame.
	pub scale: ScaleConfig,
	/// Colours and styles; swapping it takes effect on the next frame.
	pub theme: Theme,
	values: ScaledValues,
}

impl CanvasRenderer {
	/// Renderer sized to the canvas' current pixel dimensions.
	pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, theme: Theme) -> Self {
		let scale = ScaleConfig::default();
		let values = ScaledValues::new(&scale, 1.0);
		Self {
			width: canvas.width() as f64,
			height: canvas.height() as f64,
			canvas,
			ctx,
			scale,
			theme,
			values,
		}
	}

	/// Resizes the backing canvas.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
		self.width = width;
		self.height = height;
	}

	/// The canvas being drawn on.
	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	fn draw_background(&self) {
		let ctx = &self.ctx;
		let bg = &self.theme.background;
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let gradient = bg
			.use_gradient
			.then(|| {
				ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, self.width.max(self.height) * 0.8)
					.ok()
			})
			.flatten();
		match gradient {
			Some(gradient) => {
				let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
				let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			None => ctx.set_fill_style_str(&bg.color.to_css()),
		}
		ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn draw_vignette(&self) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let Ok(gradient) = self.ctx.create_radial_gradient(
			cx,
			cy,
			self.width.min(self.height) * 0.3,
			cx,
			cy,
			self.width.max(self.height) * 0.7,
		) else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
		let _ = gradient.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", self.theme.background.vignette),
		);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn draw_glow(&self, node: &Node, color: Color, intensity: f64) {
		let alpha = self.theme.node.glow_intensity * intensity;
		if alpha < 0.01 {
			return;
		}
		let (x, y) = node.position();
		let radius = self.values.node_radius(node.radius);
		let glow_radius = radius * self.scale.glow.glow_radius;
		let Ok(gradient) = self
			.ctx
			.create_radial_gradient(x, y, radius * 0.5, x, y, glow_radius)
		else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &color.lighten(0.3).with_alpha(alpha).to_css());
		let _ = gradient.add_color_stop(0.5, &color.with_alpha(alpha * 0.4).to_css());
		let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
	}

	fn draw_node(&self, node: &Node, frame: &RenderFrame<'_>) {
		let ctx = &self.ctx;
		let style = &self.theme.node;
		let (x, y) = node.position();
		let color = self.theme.node_color(node);
		let hover_t = smooth_step(frame.glow.ring_intensity(&node.id));
		let radius = self.values.node_radius(node.radius) * (1.0 + 0.2 * hover_t);
		let alpha = match node.mark {
			Mark::Dimmed => style.dimmed_alpha + (1.0 - style.dimmed_alpha) * hover_t,
			_ => 1.0,
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		let gradient = style
			.use_gradient
			.then(|| {
				ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
					.ok()
			})
			.flatten();
		match gradient {
			Some(gradient) => {
				let _ = gradient.add_color_stop(0.0, &color.lighten(0.4).to_css());
				let _ = gradient.add_color_stop(0.7, &color.to_css());
				let _ = gradient.add_color_stop(1.0, &color.darken(0.2).to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			None => ctx.set_fill_style_str(&color.to_css()),
		}
		ctx.fill();

		// Hovered nodes get a thicker border, like a stroke-width bump.
		if style.border_width > 0.0 {
			ctx.set_stroke_style_str(&style.border_color.to_css());
			ctx.set_line_width((style.border_width + 2.0 * hover_t) / self.values.k);
			ctx.stroke();
		}

		let ring = match node.mark {
			Mark::Selected => Some((style.selected_ring, 2.0, false)),
			Mark::Related => Some((style.related_ring, 1.0, true)),
			_ => None,
		};
		if let Some((ring_color, width, dashed)) = ring {
			if dashed {
				let dash = 3.0 / self.values.k;
				let _ = ctx.set_line_dash(&js_sys::Array::of2(&dash.into(), &dash.into()));
			}
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + self.values.ring_offset * width, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&ring_color.to_css());
			ctx.set_line_width(self.values.ring_width * width);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		if node.is_pinned() {
			ctx.begin_path();
			let _ = ctx.arc(x, y, (radius * 0.2).max(1.0 / self.values.k), 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&style.pin_color.to_css());
			ctx.fill();
		}

		let label_alpha = alpha * self.values.label_alpha;
		if label_alpha > 0.05 && !node.label.is_empty() {
			ctx.set_global_alpha(label_alpha);
			ctx.set_fill_style_str(&style.label_color.to_css());
			ctx.set_font(&self.values.label_font);
			ctx.set_text_align("center");
			let lines: Vec<&str> = node.label.lines().collect();
			let top = y + radius + self.values.label_line_height;
			for (i, line) in lines.iter().enumerate() {
				let _ = ctx.fill_text(line, x, top + i as f64 * self.values.label_line_height);
			}
		}
		ctx.set_global_alpha(1.0);
	}
}

impl RenderAdapter for CanvasRenderer {
	fn begin_frame(&mut self, frame: &RenderFrame<'_>) {
		self.values = ScaledValues::new(&self.scale, frame.view.scale());
		self.draw_background();
		self.ctx.save();
		let _ = self.ctx.translate(frame.view.pan_x, frame.view.pan_y);
		let _ = self.ctx.scale(frame.view.scale(), frame.view.scale());
	}

	fn draw_links(&mut self, frame: &RenderFrame<'_>) {
		let ctx = &self.ctx;
		let values = &self.values;
		for link in frame.links {
			let (source, target) = frame.endpoints(link);
			let (x1, y1) = source.position();
			let (x2, y2) = target.position();
			let (dx, dy) = (x2 - x1, y2 - y1);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 0.001 {
				continue;
			}
			let (ux, uy) = (dx / dist, dy / dist);
			let (r1, r2) = (values.node_radius(source.radius), values.node_radius(target.radius));

			let glow = smooth_step(frame.glow.edge_intensity(&source.id, &target.id));
			let color = self.theme.link_color(link);
			let color = color.with_alpha(color.a + (1.0 - color.a) * glow);
			let width = values.edge_line_width
				* match link.mark {
					Mark::Related => 1.5,
					_ => 1.0 + 0.4 * glow,
				};

			let arrows = self.theme.edge.arrows && !values.cull_arrows && dist > r1 + r2 + values.arrow_size;
			let head = if arrows { values.arrow_size } else { 0.0 };

			ctx.set_stroke_style_str(&color.to_css());
			ctx.set_line_width(width);
			ctx.begin_path();
			ctx.move_to(x1 + ux * r1, y1 + uy * r1);
			ctx.line_to(x2 - ux * (r2 + head), y2 - uy * (r2 + head));
			ctx.stroke();

			if arrows {
				let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
				let (back_x, back_y) = (tip_x - ux * head, tip_y - uy * head);
				let (px, py) = (-uy * head * 0.5, ux * head * 0.5);
				ctx.set_fill_style_str(&color.with_alpha(color.a * values.arrow_alpha).to_css());
				ctx.begin_path();
				ctx.move_to(tip_x, tip_y);
				ctx.line_to(back_x + px, back_y + py);
				ctx.line_to(back_x - px, back_y - py);
				ctx.close_path();
				ctx.fill();
			}
		}
	}

	fn draw_nodes(&mut self, frame: &RenderFrame<'_>) {
		// Pass 1: hover glows
		for node in frame.nodes {
			let t = smooth_step(frame.glow.node_intensity(&node.id));
			if t > 0.001 {
				self.draw_glow(node, self.theme.node_color(node), t);
			}
		}

		// Pass 2: everything else
		for node in frame.nodes.iter().filter(|&n| !frame.glow.raises(n)) {
			self.draw_node(node, frame);
		}
		// Pass 3: marked and glowing nodes on top, matching hit-test order
		for node in frame.nodes.iter().filter(|&n| frame.glow.raises(n)) {
			self.draw_node(node, frame);
		}
	}

	fn end_frame(&mut self, _frame: &RenderFrame<'_>) {
		self.ctx.restore();
		if self.theme.background.vignette > 0.0 {
			self.draw_vignette();
		}
	}

	fn pointer_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(x - rect.left(), y - rect.top())
	}
}
