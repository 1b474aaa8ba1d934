//! Builds a graph from a map of home-automation entity states.
//!
//! Each entity becomes an `entity` node coloured by its state. Entities that
//! share a domain (the part of the id before the first `.`) are linked
//! pairwise with `domain` links.

use std::collections::BTreeMap;

use serde_json::Value;

use super::dto::{GraphData, LinkDto, NodeDto};

/// States `on`, `active` and `home`.
pub const ACTIVE_COLOR: &str = "#4CAF50";
/// States `off`, `idle` and `unavailable`.
pub const INACTIVE_COLOR: &str = "#9E9E9E";
/// States `problem`, `error` and `normal`.
pub const ALERT_COLOR: &str = "#F44336";
/// Every other state.
pub const OTHER_COLOR: &str = "#2196F3";

/// Colour for an entity's `state.state` value.
pub fn entity_color(entity: &Value) -> &'static str {
	match entity.pointer("/state/state").and_then(Value::as_str) {
		Some("on" | "active" | "home") => ACTIVE_COLOR,
		Some("off" | "idle" | "unavailable") => INACTIVE_COLOR,
		Some("problem" | "error" | "normal") => ALERT_COLOR,
		_ => OTHER_COLOR,
	}
}

/// `state.attributes.numeric_state`, else a numeric `state.state`.
pub fn entity_value(entity: &Value) -> Option<f64> {
	entity
		.pointer("/state/attributes/numeric_state")
		.and_then(Value::as_f64)
		.or_else(|| entity.pointer("/state/state").and_then(Value::as_f64))
		.filter(|v| v.is_finite())
}

fn domain(entity_id: &str) -> &str {
	entity_id.split('.').next().unwrap_or(entity_id)
}

/// Builds nodes and same-domain links, in entity id order.
pub fn graph_from_entities(entities: &BTreeMap<String, Value>) -> GraphData {
	let nodes: Vec<NodeDto> = entities
		.iter()
		.map(|(id, entity)| NodeDto {
			id: id.clone(),
			kind: Some("entity".to_string()),
			label: Some(id.replacen('.', "\n", 1)),
			value: entity_value(entity),
			color: Some(entity_color(entity).to_string()),
			..NodeDto::default()
		})
		.collect();

	let mut links = Vec::new();
	for (i, source) in nodes.iter().enumerate() {
		for target in &nodes[i + 1..] {
			if domain(&source.id) == domain(&target.id) {
				links.push(LinkDto {
					source: source.id.clone(),
					target: target.id.clone(),
					weight: Some(1.0),
					kind: Some("domain".to_string()),
					..LinkDto::default()
				});
			}
		}
	}

	GraphData { nodes, links }
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::engine::types::NodeKind;

	fn entities() -> BTreeMap<String, Value> {
		[
			("light.kitchen", json!({ "state": { "state": "on" } })),
			("light.hall", json!({ "state": { "state": "off" } })),
			("light.porch", json!({ "state": { "state": "error" } })),
			(
				"sensor.temp",
				json!({ "state": { "state": "21.5", "attributes": { "numeric_state": 21.5 } } }),
			),
			("person.sam", json!({ "state": { "state": "away" } })),
		]
		.into_iter()
		.map(|(k, v)| (k.to_string(), v))
		.collect()
	}

	#[test]
	fn same_domain_entities_are_linked_pairwise() {
		let data = graph_from_entities(&entities());
		assert_eq!(data.nodes.len(), 5);
		// Three lights -> three pairs; the others are alone in their domain.
		assert_eq!(data.links.len(), 3);
		assert!(data.links.iter().all(|l| l.kind.as_deref() == Some("domain")));
		assert!(
			data.links
				.iter()
				.all(|l| l.source.starts_with("light.") && l.target.starts_with("light."))
		);
	}

	#[test]
	fn state_drives_color_and_value() {
		let data = graph_from_entities(&entities());
		let node = |id: &str| data.nodes.iter().find(|n| n.id == id).unwrap();

		assert_eq!(node("light.kitchen").color.as_deref(), Some(ACTIVE_COLOR));
		assert_eq!(node("light.hall").color.as_deref(), Some(INACTIVE_COLOR));
		assert_eq!(node("light.porch").color.as_deref(), Some(ALERT_COLOR));
		assert_eq!(node("person.sam").color.as_deref(), Some(OTHER_COLOR));
		assert_eq!(node("sensor.temp").value, Some(21.5));
		assert_eq!(node("light.kitchen").value, None);
		assert_eq!(node("sensor.temp").label.as_deref(), Some("sensor\ntemp"));
	}

	#[test]
	fn converts_to_entity_specs() {
		let (nodes, links) = graph_from_entities(&entities()).into_specs();
		assert!(nodes.iter().all(|n| n.kind == NodeKind::Entity));
		assert_eq!(links[0].weight, Some(1.0));
	}
}
