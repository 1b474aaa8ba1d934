//! Typed node and link model shared by every engine component.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::NodeSizing;

/// Free-form attributes carried through from the data source.
pub type Metadata = BTreeMap<String, Value>;

/// What a node represents in the visualized graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// A device or sensor state.
	#[default]
	Entity,
	Mood,
	Neuron,
	Habitus,
	Behavior,
}

impl NodeKind {
	/// All kinds, in legend order.
	pub const ALL: [NodeKind; 5] = [
		NodeKind::Entity,
		NodeKind::Mood,
		NodeKind::Neuron,
		NodeKind::Habitus,
		NodeKind::Behavior,
	];

	/// Parses a kind name case-insensitively. Returns `None` for unknown names.
	pub fn parse(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"entity" => Some(NodeKind::Entity),
			"mood" => Some(NodeKind::Mood),
			"neuron" => Some(NodeKind::Neuron),
			"habitus" => Some(NodeKind::Habitus),
			"behavior" | "behaviour" => Some(NodeKind::Behavior),
			_ => None,
		}
	}

	/// Lower-case wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Entity => "entity",
			NodeKind::Mood => "mood",
			NodeKind::Neuron => "neuron",
			NodeKind::Habitus => "habitus",
			NodeKind::Behavior => "behavior",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Highlight flag derived from the current selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mark {
	/// No selection is active.
	#[default]
	Normal,
	/// The selected node itself.
	Selected,
	/// Adjacent to the selected node.
	Related,
	/// Unrelated to the selected node.
	Dimmed,
}

/// Caller-supplied node description, without any simulation state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSpec {
	/// Unique across live and staged nodes.
	pub id: String,
	pub kind: NodeKind,
	/// Display text. Newlines split it into lines.
	pub label: String,
	/// Magnitude used for radius derivation.
	pub value: Option<f64>,
	/// CSS colour overriding the kind colour.
	pub color: Option<String>,
	/// Explicit radius. Derived from `value` when absent.
	pub radius: Option<f64>,
	/// Fields carried through untouched.
	pub metadata: Metadata,
}

impl NodeSpec {
	/// Node labelled with its own id.
	pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
		let id = id.into();
		Self {
			label: id.clone(),
			id,
			kind,
			..Self::default()
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_value(mut self, value: f64) -> Self {
		self.value = Some(value);
		self
	}

	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = Some(color.into());
		self
	}

	pub fn with_radius(mut self, radius: f64) -> Self {
		self.radius = Some(radius);
		self
	}

	/// Radius this node is drawn and hit-tested with.
	pub fn resolved_radius(&self, sizing: &NodeSizing) -> f64 {
		let r = self
			.radius
			.unwrap_or_else(|| sizing.base_radius + self.value.unwrap_or(0.0) * sizing.value_scale);
		if r.is_nan() {
			return sizing.min_radius;
		}
		r.min(sizing.max_radius).max(sizing.min_radius)
	}
}

/// A live node: caller-visible fields plus simulation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub value: Option<f64>,
	pub color: Option<String>,
	/// Resolved radius in model units.
	pub radius: f64,
	pub metadata: Metadata,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x. `None` means free.
	pub fx: Option<f64>,
	/// Pinned y. `None` means free.
	pub fy: Option<f64>,
	/// Pinned by the host rather than by a drag; survives drag release.
	pub fixed: bool,
	pub mark: Mark,
}

impl Node {
	pub(crate) fn from_spec(spec: NodeSpec, sizing: &NodeSizing, x: f64, y: f64) -> Self {
		let radius = spec.resolved_radius(sizing);
		Self {
			id: spec.id,
			kind: spec.kind,
			label: spec.label,
			value: spec.value,
			color: spec.color,
			radius,
			metadata: spec.metadata,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			fixed: false,
			mark: Mark::Normal,
		}
	}

	/// Overwrites the mutable display fields. Returns true if anything changed.
	pub(crate) fn update_from(&mut self, spec: NodeSpec, sizing: &NodeSizing) -> bool {
		let radius = spec.resolved_radius(sizing);
		let changed = self.kind != spec.kind
			|| self.label != spec.label
			|| self.value != spec.value
			|| self.color != spec.color
			|| self.radius != radius
			|| self.metadata != spec.metadata;
		self.kind = spec.kind;
		self.label = spec.label;
		self.value = spec.value;
		self.color = spec.color;
		self.radius = radius;
		self.metadata = spec.metadata;
		changed
	}

	/// Whether both axes are pinned.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}

	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	pub(crate) fn pin(&mut self, x: f64, y: f64) {
		self.fx = Some(x);
		self.fy = Some(y);
	}

	pub(crate) fn unpin(&mut self) {
		self.fx = None;
		self.fy = None;
	}
}

/// An edge between two nodes, referenced by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Link {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Shortens the spring rest length when positive.
	pub weight: Option<f64>,
	/// Relationship name, e.g. `domain`.
	pub kind: Option<String>,
	pub metadata: Metadata,
}

impl Link {
	/// Link with weight 1.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			..Self::default()
		}
	}

	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}

	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());
		self
	}

	/// True if either endpoint is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// A live link with endpoints resolved to node slots.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkState {
	pub link: Link,
	/// Index of the source in the live node list.
	pub source: usize,
	/// Index of the target in the live node list.
	pub target: usize,
	pub mark: Mark,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_follows_value_within_bounds() {
		let sizing = NodeSizing::default();
		let spec = NodeSpec::new("a", NodeKind::Entity);
		assert_eq!(spec.resolved_radius(&sizing), 15.0);
		assert_eq!(spec.clone().with_value(5.0).resolved_radius(&sizing), 25.0);
		assert_eq!(spec.clone().with_value(-100.0).resolved_radius(&sizing), 1.0);
		assert_eq!(spec.with_radius(8.0).resolved_radius(&sizing), 8.0);
	}

	#[test]
	fn huge_value_yields_finite_capped_radius() {
		let sizing = NodeSizing::default();
		let r = NodeSpec::new("a", NodeKind::Entity)
			.with_value(1e308)
			.resolved_radius(&sizing);
		assert!(r.is_finite());
		assert_eq!(r, sizing.max_radius);
	}
}
