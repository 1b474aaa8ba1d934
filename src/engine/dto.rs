//! Wire shapes accepted from the data source.
//!
//! These mirror what the graph REST endpoint returns. They are converted once
//! into [`NodeSpec`] / [`Link`]; nothing inside the engine reads the raw
//! attribute bags.

use serde::{Deserialize, Serialize};

use super::types::{Link, Metadata, NodeKind, NodeSpec};

/// A node as delivered by the data source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDto {
	/// Unique identifier. Links reference nodes by this id.
	pub id: String,
	/// Node kind name (`entity`, `mood`, ...). Also accepted as `type`.
	#[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Display label. Falls back to the id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, alias = "score", skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
	/// CSS color override. Otherwise the renderer colors by kind.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Explicit radius. Also accepted as `size`.
	#[serde(default, alias = "size", skip_serializing_if = "Option::is_none")]
	pub radius: Option<f64>,
	/// Everything else the source sent.
	#[serde(flatten)]
	pub extra: Metadata,
}

/// A link as delivered by the data source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkDto {
	pub source: String,
	pub target: String,
	/// Accepted as `weight`, `value` or `strength`.
	#[serde(
		default,
		alias = "value",
		alias = "strength",
		skip_serializing_if = "Option::is_none"
	)]
	pub weight: Option<f64>,
	#[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(flatten)]
	pub extra: Metadata,
}

/// Complete graph payload: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<NodeDto>,
	#[serde(default, alias = "edges")]
	pub links: Vec<LinkDto>,
}

impl GraphData {
	/// Parses the JSON wire format.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Converts into typed specs ready for `set_data`.
	pub fn into_specs(self) -> (Vec<NodeSpec>, Vec<Link>) {
		(
			self.nodes.into_iter().map(NodeSpec::from).collect(),
			self.links.into_iter().map(Link::from).collect(),
		)
	}

	/// No nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

impl From<NodeDto> for NodeSpec {
	fn from(dto: NodeDto) -> Self {
		let mut metadata = dto.extra;
		let kind = match dto.kind {
			Some(name) => NodeKind::parse(&name).unwrap_or_else(|| {
				log::debug!("node {}: unknown kind {name:?}, treating as entity", dto.id);
				metadata.insert("kind".to_string(), serde_json::Value::String(name));
				NodeKind::Entity
			}),
			None => NodeKind::Entity,
		};
		NodeSpec {
			label: dto.label.unwrap_or_else(|| dto.id.clone()),
			id: dto.id,
			kind,
			value: dto.value,
			color: dto.color,
			radius: dto.radius,
			metadata,
		}
	}
}

impl From<LinkDto> for Link {
	fn from(dto: LinkDto) -> Self {
		Link {
			source: dto.source,
			target: dto.target,
			weight: dto.weight,
			kind: dto.kind,
			metadata: dto.extra,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_rest_field_aliases() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{ "id": "light.kitchen", "type": "entity", "label": "Kitchen", "domain": "light", "score": 0.8 },
					{ "id": "mood.calm", "type": "Mood", "size": 24 }
				],
				"edges": [
					{ "source": "light.kitchen", "target": "mood.calm", "type": "affects", "weight": 2.0 }
				]
			}"#,
		)
		.unwrap();

		let (nodes, links) = data.into_specs();
		assert_eq!(nodes[0].kind, NodeKind::Entity);
		assert_eq!(nodes[0].value, Some(0.8));
		assert_eq!(nodes[0].metadata["domain"], "light");
		assert_eq!(nodes[1].kind, NodeKind::Mood);
		assert_eq!(nodes[1].label, "mood.calm");
		assert_eq!(nodes[1].radius, Some(24.0));
		assert_eq!(links[0].weight, Some(2.0));
		assert_eq!(links[0].kind.as_deref(), Some("affects"));
	}

	#[test]
	fn unknown_kind_is_kept_in_metadata() {
		let spec = NodeSpec::from(NodeDto {
			id: "zone.living".into(),
			kind: Some("zone".into()),
			..NodeDto::default()
		});
		assert_eq!(spec.kind, NodeKind::Entity);
		assert_eq!(spec.metadata["kind"], "zone");
	}
}
