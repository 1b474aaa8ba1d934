//! Merges staged mutations into live simulation state.
//!
//! Persisting nodes keep position, velocity and pin state; only their display
//! fields are overwritten. Entering nodes are placed near the centroid of the
//! current layout with a little jitter so they never start coincident.

use std::collections::{HashMap, HashSet};

use log::debug;
use rand::Rng;
use rand::rngs::SmallRng;

use super::config::{NodeSizing, SimulationConfig};
use super::model::{GraphModel, Mutation};
use super::types::{Link, LinkState, Node, NodeSpec};

/// What a reconciliation pass changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	/// Ids of nodes that became live.
	pub entered: Vec<String>,
	/// Ids of nodes that were removed.
	pub exited: Vec<String>,
	/// Persisting nodes whose display fields actually changed.
	pub updated: Vec<String>,
	pub links_added: usize,
	pub links_removed: usize,
}

impl ReconcileReport {
	/// True if the layout topology changed and the simulation should reheat.
	pub fn needs_reheat(&self) -> bool {
		!self.entered.is_empty()
			|| !self.exited.is_empty()
			|| self.links_added > 0
			|| self.links_removed > 0
	}

	/// Nothing changed at all.
	pub fn is_noop(&self) -> bool {
		!self.needs_reheat() && self.updated.is_empty()
	}

	fn absorb(&mut self, other: ReconcileReport) {
		self.entered.extend(other.entered);
		self.exited.extend(other.exited);
		self.updated.extend(other.updated);
		self.links_added += other.links_added;
		self.links_removed += other.links_removed;
	}
}

/// Applies staged [`Mutation`]s to a [`GraphModel`].
pub(crate) struct Reconciler<'a> {
	sizing: &'a NodeSizing,
	jitter: f64,
	/// Where entering nodes go when the graph is empty.
	center: (f64, f64),
}

impl<'a> Reconciler<'a> {
	pub fn new(sizing: &'a NodeSizing, simulation: &SimulationConfig, center: (f64, f64)) -> Self {
		Self {
			sizing,
			jitter: simulation.entry_jitter.abs(),
			center,
		}
	}

	/// Drains and applies every staged mutation, in submission order.
	pub fn apply(&self, model: &mut GraphModel, rng: &mut SmallRng) -> ReconcileReport {
		let mut report = ReconcileReport::default();
		for mutation in model.take_pending() {
			let step = match mutation {
				Mutation::Replace { nodes, links } => self.replace(model, nodes, links, rng),
				Mutation::AddNode(spec) => self.enter(model, spec, rng),
				Mutation::AddLink(link) => add_link(model, link),
				Mutation::RemoveNode(id) => remove_node(model, &id),
				Mutation::RemoveLink { source, target } => remove_link(model, &source, &target),
			};
			report.absorb(step);
		}
		if !report.is_noop() {
			debug!(
				"reconciled: +{} -{} ~{} nodes, +{} -{} links",
				report.entered.len(),
				report.exited.len(),
				report.updated.len(),
				report.links_added,
				report.links_removed
			);
		}
		report
	}

	fn replace(
		&self,
		model: &mut GraphModel,
		nodes: Vec<NodeSpec>,
		links: Vec<Link>,
		rng: &mut SmallRng,
	) -> ReconcileReport {
		let mut report = ReconcileReport::default();
		let previous_links = link_counts(&model.links);
		let incoming: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

		// Exits first, so a re-entering id never collides with its old slot.
		model.nodes.retain(|node| {
			let keep = incoming.contains(node.id.as_str());
			if !keep {
				report.exited.push(node.id.clone());
			}
			keep
		});
		model.reindex();

		// Placement anchor is computed from survivors only.
		let anchor = model.centroid().unwrap_or(self.center);

		let mut specs: HashMap<String, NodeSpec> = HashMap::with_capacity(nodes.len());
		let mut order = Vec::with_capacity(nodes.len());
		for spec in nodes {
			order.push(spec.id.clone());
			specs.insert(spec.id.clone(), spec);
		}

		// Entries, in the order the caller listed them.
		for id in &order {
			if !model.contains(id) {
				if let Some(spec) = specs.remove(id) {
					let node = self.spawn(spec, anchor, rng);
					report.entered.push(node.id.clone());
					model.nodes.push(node);
				}
			}
		}

		// Field updates on persisting nodes.
		let sizing = self.sizing;
		for node in &mut model.nodes {
			if let Some(spec) = specs.remove(&node.id) {
				if node.update_from(spec, sizing) {
					report.updated.push(node.id.clone());
				}
			}
		}
		model.reindex();

		let (added, removed) = replace_links(model, previous_links, links);
		report.links_added = added;
		report.links_removed = removed;
		report
	}

	fn enter(
		&self,
		model: &mut GraphModel,
		spec: NodeSpec,
		rng: &mut SmallRng,
	) -> ReconcileReport {
		let anchor = model.centroid().unwrap_or(self.center);
		let node = self.spawn(spec, anchor, rng);
		let report = ReconcileReport {
			entered: vec![node.id.clone()],
			..ReconcileReport::default()
		};
		model.nodes.push(node);
		model.reindex();
		report
	}

	fn spawn(&self, spec: NodeSpec, anchor: (f64, f64), rng: &mut SmallRng) -> Node {
		let (jx, jy) = if self.jitter > 0.0 {
			(
				rng.random_range(-self.jitter..=self.jitter),
				rng.random_range(-self.jitter..=self.jitter),
			)
		} else {
			(0.0, 0.0)
		};
		Node::from_spec(spec, self.sizing, anchor.0 + jx, anchor.1 + jy)
	}
}

type LinkKey = (String, String, Option<String>);

fn link_key(link: &Link) -> LinkKey {
	(link.source.clone(), link.target.clone(), link.kind.clone())
}

fn link_counts(links: &[LinkState]) -> HashMap<LinkKey, usize> {
	let mut counts = HashMap::new();
	for state in links {
		*counts.entry(link_key(&state.link)).or_insert(0) += 1;
	}
	counts
}

/// Swaps the live link set for `links`, returning (added, removed) counts
/// as a multiset difference against `old`, keyed by endpoints and kind.
fn replace_links(
	model: &mut GraphModel,
	mut old: HashMap<LinkKey, usize>,
	links: Vec<Link>,
) -> (usize, usize) {
	let mut added = 0;
	let mut next = Vec::with_capacity(links.len());
	for link in links {
		match old.get_mut(&link_key(&link)) {
			Some(count) if *count > 0 => *count -= 1,
			_ => added += 1,
		}
		if let (Some(source), Some(target)) =
			(model.index_of(&link.source), model.index_of(&link.target))
		{
			next.push(LinkState {
				link,
				source,
				target,
				mark: Default::default(),
			});
		}
	}
	let removed = old.values().sum();
	model.links = next;
	(added, removed)
}

fn add_link(model: &mut GraphModel, link: Link) -> ReconcileReport {
	let endpoints = (model.index_of(&link.source), model.index_of(&link.target));
	let (Some(source), Some(target)) = endpoints else {
		// Endpoints were checked when the link was staged.
		return ReconcileReport::default();
	};
	model.links.push(LinkState {
		link,
		source,
		target,
		mark: Default::default(),
	});
	ReconcileReport {
		links_added: 1,
		..ReconcileReport::default()
	}
}

fn remove_node(model: &mut GraphModel, id: &str) -> ReconcileReport {
	let before_links = model.links.len();
	let before_nodes = model.nodes.len();
	model.nodes.retain(|n| n.id != id);
	if model.nodes.len() == before_nodes {
		return ReconcileReport::default();
	}
	model.reindex();
	ReconcileReport {
		exited: vec![id.to_string()],
		links_removed: before_links - model.links.len(),
		..ReconcileReport::default()
	}
}

fn remove_link(model: &mut GraphModel, source: &str, target: &str) -> ReconcileReport {
	let before = model.links.len();
	model
		.links
		.retain(|l| !(l.link.source == source && l.link.target == target));
	ReconcileReport {
		links_removed: before - model.links.len(),
		..ReconcileReport::default()
	}
}
