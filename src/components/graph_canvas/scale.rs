//! Zoom-dependent scaling for canvas visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: simulation coordinates. Values in world-space scale
//!   with zoom (appear larger when zoomed in).
//! - **Screen-space**: canvas pixels. Values in screen-space stay constant
//!   regardless of zoom.
//!
//! Drawing happens after the view transform is applied to the context, so
//! every value handed to the renderer is in world-space.

/// How a visual size reacts to the zoom level `k`.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space size, clamped to `[min_screen, max_screen]` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen = world * k, so the world-space bounds are screen / k.
				base.clamp(min_screen / k, max_screen / k)
			}
		}
	}
}

/// How an opacity reacts to the zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Linear in zoom, clamped to [0, 1].
	ScaleWithZoom,
	/// Zero at `zero_alpha_k`, fully visible at `full_alpha_k`.
	Fade { zero_alpha_k: f64, full_alpha_k: f64 },
}

impl AlphaBehavior {
	/// Opacity at zoom `k`.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

/// Node sizing. The base radius comes from each node.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	pub radius_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom the font stops shrinking.
	pub label_min_k: f64,
	/// Label visibility as the view zooms out.
	pub label_alpha_behavior: AlphaBehavior,
}

#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Arrow head length in world units.
	pub arrow_size: f64,
	pub arrow_behavior: ScaleBehavior,
	pub arrow_alpha_behavior: AlphaBehavior,
	/// Arrows fainter than this are skipped.
	pub cull_alpha: f64,
}

/// Hover glow and selection ring sizing.
#[derive(Clone, Debug)]
pub struct GlowScaleConfig {
	/// Glow radius multiplier relative to the node radius.
	pub glow_radius: f64,
	/// Ring stroke in screen pixels.
	pub ring_width: ScaleBehavior,
	/// Gap between node edge and ring, screen pixels.
	pub ring_offset: f64,
}

/// Sizing for every visual element.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub glow: GlowScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_min_k: 0.5,
				label_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.3,
					full_alpha_k: 0.6,
				},
			},
			edge: EdgeScaleConfig {
				line_width: 2.0,
				arrow_size: 6.0,
				arrow_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 18.0,
				},
				arrow_alpha_behavior: AlphaBehavior::ScaleWithZoom,
				cull_alpha: 0.05,
			},
			glow: GlowScaleConfig {
				glow_radius: 2.5,
				ring_width: ScaleBehavior::Screen,
				ring_offset: 2.0,
			},
		}
	}
}

/// Scale values for one zoom level. Build once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	/// CSS font string, e.g. `"11px sans-serif"`.
	pub label_font: String,
	/// Line height for multi-line labels, world units.
	pub label_line_height: f64,
	pub label_alpha: f64,
	pub edge_line_width: f64,
	pub arrow_size: f64,
	pub arrow_alpha: f64,
	pub cull_arrows: bool,
	pub ring_width: f64,
	pub ring_offset: f64,
	radius_behavior: ScaleBehavior,
}

impl ScaledValues {
	/// Evaluates `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font_size = config.node.label_size / k.max(config.node.label_min_k);
		let arrow_alpha = config.edge.arrow_alpha_behavior.apply(k);
		Self {
			k,
			label_font: format!("{font_size}px sans-serif"),
			label_line_height: font_size * 1.2,
			label_alpha: config.node.label_alpha_behavior.apply(k),
			edge_line_width: config.edge.line_width / k,
			arrow_size: config.edge.arrow_behavior.apply(config.edge.arrow_size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.edge.cull_alpha,
			ring_width: config.glow.ring_width.apply(1.5, k),
			ring_offset: config.glow.ring_offset / k,
			radius_behavior: config.node.radius_behavior.clone(),
		}
	}

	/// Drawn radius for a node whose model radius is `radius`.
	pub fn node_radius(&self, radius: f64) -> f64 {
		self.radius_behavior.apply(radius, self.k)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_radius_keeps_minimum_screen_size() {
		let values = ScaledValues::new(&ScaleConfig::default(), 0.1);
		// 15 world units at k = 0.1 is 1.5px on screen, below the 3px floor.
		assert!((values.node_radius(15.0) * 0.1 - 3.0).abs() < 1e-9);
		let values = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(values.node_radius(15.0), 15.0);
	}

	#[test]
	fn labels_fade_out_when_zoomed_far_out() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 0.2).label_alpha, 0.0);
		assert_eq!(ScaledValues::new(&config, 1.0).label_alpha, 1.0);
	}

	#[test]
	fn screen_sizes_compensate_for_zoom() {
		let values = ScaledValues::new(&ScaleConfig::default(), 4.0);
		assert_eq!(values.edge_line_width * 4.0, 2.0);
		assert_eq!(values.ring_width * 4.0, 1.5);
	}
}
