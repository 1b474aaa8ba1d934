//! Visual theming for the graph canvas.
//!
//! Nodes without an explicit colour are coloured by kind; links by kind,
//! with `domain` links taking the entity colour.

use crate::engine::{LinkState, Mark, Node, NodeKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// `#rrggbb` when opaque, else `rgba(...)`.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB`, `#RGB` and `rgb()`/`rgba()` notation. Anything else
	/// yields `None`.
	pub fn parse(css: &str) -> Option<Self> {
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#') {
			if !hex.is_ascii() {
				return None;
			}
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			return match hex.len() {
				6 => Some(Color::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				3 => {
					let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					Some(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => None,
			};
		}
		let body = css
			.strip_prefix("rgba(")
			.or_else(|| css.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = body.split(',').map(str::trim).collect();
		let channel = |i: usize| parts.get(i).and_then(|s| s.parse::<u8>().ok());
		let alpha = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
	}
}

/// Per-kind fill colours.
#[derive(Clone, Debug)]
pub struct KindPalette {
	pub entity: Color,
	pub mood: Color,
	pub neuron: Color,
	pub habitus: Color,
	pub behavior: Color,
	/// Used when a node's explicit colour can't be parsed.
	pub fallback: Color,
}

impl KindPalette {
	/// Fill colour for `kind`.
	pub fn get(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::Entity => self.entity,
			NodeKind::Mood => self.mood,
			NodeKind::Neuron => self.neuron,
			NodeKind::Habitus => self.habitus,
			NodeKind::Behavior => self.behavior,
		}
	}
}

impl Default for KindPalette {
	fn default() -> Self {
		Self {
			entity: Color::rgb(0x21, 0x96, 0xf3),
			mood: Color::rgb(0xff, 0x98, 0x00),
			neuron: Color::rgb(0x4c, 0xaf, 0x50),
			habitus: Color::rgb(0x9c, 0x27, 0xb0),
			behavior: Color::rgb(0x60, 0x7d, 0x8b),
			fallback: Color::rgb(0x9e, 0x9e, 0x9e),
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Centre colour of the radial gradient.
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Link colours by mark.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Opacity of links adjacent to the selection.
	pub related_alpha: f64,
	/// Opacity of links away from the selection.
	pub dimmed_alpha: f64,
	/// Draw arrow heads at the target end.
	pub arrows: bool,
}

/// Node fill, rings and labels.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub use_gradient: bool,
	/// Hover glow opacity.
	pub glow_intensity: f64,
	pub border_width: f64,
	pub border_color: Color,
	/// Opacity of nodes away from the selection.
	pub dimmed_alpha: f64,
	pub selected_ring: Color,
	pub related_ring: Color,
	/// Small centre dot on pinned nodes.
	pub pin_color: Color,
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub kinds: KindPalette,
}

impl Theme {
	/// Dark panel theme (default)
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(0x9e, 0x9e, 0x9e, 0.6),
				related_alpha: 1.0,
				dimmed_alpha: 0.15,
				arrows: true,
			},
			node: NodeStyle {
				use_gradient: true,
				glow_intensity: 0.6,
				border_width: 2.0,
				border_color: Color::rgb(255, 255, 255),
				dimmed_alpha: 0.3,
				selected_ring: Color::rgb(255, 255, 255),
				related_ring: Color::rgb(0xff, 0x98, 0x00),
				pin_color: Color::rgba(255, 255, 255, 0.9),
				label_color: Color::rgba(255, 255, 255, 0.9),
			},
			kinds: KindPalette::default(),
		}
	}

	/// Light theme for bright dashboards
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 250),
				color_secondary: Color::rgb(250, 250, 250),
				use_gradient: false,
				vignette: 0.0,
			},
			edge: EdgeStyle {
				color: Color::rgba(0x75, 0x75, 0x75, 0.6),
				related_alpha: 1.0,
				dimmed_alpha: 0.12,
				arrows: true,
			},
			node: NodeStyle {
				use_gradient: false,
				glow_intensity: 0.4,
				border_width: 2.0,
				border_color: Color::rgb(255, 255, 255),
				dimmed_alpha: 0.3,
				selected_ring: Color::rgb(33, 33, 33),
				related_ring: Color::rgb(0xff, 0x98, 0x00),
				pin_color: Color::rgba(33, 33, 33, 0.8),
				label_color: Color::rgba(33, 33, 33, 0.9),
			},
			kinds: KindPalette::default(),
		}
	}

	/// Looks a theme up by name, e.g. from a `data-theme` attribute.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"dark" => Some(Self::dark()),
			"light" => Some(Self::light()),
			_ => None,
		}
	}

	/// Explicit node colour if it parses, else the kind colour.
	pub fn node_color(&self, node: &Node) -> Color {
		match &node.color {
			Some(css) => Color::parse(css).unwrap_or(self.kinds.fallback),
			None => self.kinds.get(node.kind),
		}
	}

	/// Stroke colour for a link, faded or emphasised by its mark.
	pub fn link_color(&self, link: &LinkState) -> Color {
		let base = match link.link.kind.as_deref() {
			Some("domain") => self.kinds.entity.with_alpha(self.edge.color.a),
			_ => self.edge.color,
		};
		let alpha = match link.mark {
			Mark::Related | Mark::Selected => self.edge.related_alpha,
			Mark::Dimmed => self.edge.dimmed_alpha,
			Mark::Normal => base.a,
		};
		base.with_alpha(alpha)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}
