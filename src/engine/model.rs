//! Authoritative node/link storage.
//!
//! Mutations are validated synchronously against the *declared* id set (the
//! ids the model will hold once every staged mutation is applied) and then
//! staged. The reconciler applies staged mutations at the next tick
//! boundary, so a tick never observes half-applied data.

use std::collections::{HashMap, HashSet};

use super::error::ValidationError;
use super::types::{Link, LinkState, Node, NodeSpec};

/// A validated mutation waiting for the next reconciliation pass.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Mutation {
	Replace { nodes: Vec<NodeSpec>, links: Vec<Link> },
	AddNode(NodeSpec),
	AddLink(Link),
	RemoveNode(String),
	RemoveLink { source: String, target: String },
}

/// Live graph state plus the queue of staged mutations.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	pub(crate) nodes: Vec<Node>,
	pub(crate) links: Vec<LinkState>,
	index: HashMap<String, usize>,
	declared_nodes: HashSet<String>,
	/// Declared links as (source, target) pairs, with multiplicity.
	declared_links: Vec<(String, String)>,
	pending: Vec<Mutation>,
}

impl GraphModel {
	/// Empty model with nothing staged.
	pub fn new() -> Self {
		Self::default()
	}

	/// Validates and stages a full dataset replacement.
	pub fn set_data(&mut self, nodes: Vec<NodeSpec>, links: Vec<Link>) -> Result<(), ValidationError> {
		let mut ids = HashSet::with_capacity(nodes.len());
		for node in &nodes {
			check_node_numbers(node)?;
			if !ids.insert(node.id.clone()) {
				return Err(ValidationError::DuplicateNode(node.id.clone()));
			}
		}
		for link in &links {
			check_link(link, |id| ids.contains(id))?;
		}

		self.declared_nodes = ids;
		self.declared_links = links
			.iter()
			.map(|l| (l.source.clone(), l.target.clone()))
			.collect();
		// A replacement supersedes anything staged before it.
		self.pending.clear();
		self.pending.push(Mutation::Replace { nodes, links });
		Ok(())
	}

	/// Stages a node whose id is not yet declared.
	pub fn add_node(&mut self, node: NodeSpec) -> Result<(), ValidationError> {
		check_node_numbers(&node)?;
		if self.declared_nodes.contains(&node.id) {
			return Err(ValidationError::DuplicateNode(node.id));
		}
		self.declared_nodes.insert(node.id.clone());
		self.pending.push(Mutation::AddNode(node));
		Ok(())
	}

	/// Stages a link between declared nodes.
	pub fn add_link(&mut self, link: Link) -> Result<(), ValidationError> {
		check_link(&link, |id| self.declared_nodes.contains(id))?;
		self.declared_links
			.push((link.source.clone(), link.target.clone()));
		self.pending.push(Mutation::AddLink(link));
		Ok(())
	}

	/// Stages removal of a node and every link touching it.
	pub fn remove_node(&mut self, id: &str) -> Result<(), ValidationError> {
		if !self.declared_nodes.remove(id) {
			return Err(ValidationError::UnknownNode(id.to_string()));
		}
		self.declared_links.retain(|(s, t)| s != id && t != id);
		self.pending.push(Mutation::RemoveNode(id.to_string()));
		Ok(())
	}

	/// Stages removal of every link from `source` to `target`.
	pub fn remove_link(&mut self, source: &str, target: &str) -> Result<(), ValidationError> {
		let before = self.declared_links.len();
		self.declared_links
			.retain(|(s, t)| !(s == source && t == target));
		if self.declared_links.len() == before {
			return Err(ValidationError::UnknownLink {
				source_id: source.to_string(),
				target_id: target.to_string(),
			});
		}
		self.pending.push(Mutation::RemoveLink {
			source: source.to_string(),
			target: target.to_string(),
		});
		Ok(())
	}

	/// Whether mutations are waiting for the next reconcile.
	pub fn has_pending(&self) -> bool {
		!self.pending.is_empty()
	}

	pub(crate) fn take_pending(&mut self) -> Vec<Mutation> {
		std::mem::take(&mut self.pending)
	}

	/// Live nodes, in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Live links, with endpoints resolved to indices into [`nodes`](Self::nodes).
	pub fn links(&self) -> &[LinkState] {
		&self.links
	}

	/// Live node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	/// Position of a live node in [`nodes`](Self::nodes).
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Whether `id` is a live node.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Number of live nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether there are no live nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Mean position of the live nodes.
	pub fn centroid(&self) -> Option<(f64, f64)> {
		if self.nodes.is_empty() {
			return None;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		Some((sx / n, sy / n))
	}

	/// Rebuilds the id index and re-resolves link endpoints after the node
	/// vector has been reshuffled. Links whose endpoints vanished are dropped.
	pub(crate) fn reindex(&mut self) {
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		let index = &self.index;
		self.links.retain_mut(|state| {
			match (index.get(&state.link.source), index.get(&state.link.target)) {
				(Some(&s), Some(&t)) => {
					state.source = s;
					state.target = t;
					true
				}
				_ => false,
			}
		});
	}

	pub(crate) fn clear(&mut self) {
		*self = Self::default();
	}
}

fn check_node_numbers(node: &NodeSpec) -> Result<(), ValidationError> {
	let fields = [("value", node.value), ("radius", node.radius)];
	for (field, v) in fields {
		if v.is_some_and(|v| !v.is_finite()) {
			return Err(ValidationError::NonFinite {
				id: node.id.clone(),
				field,
			});
		}
	}
	Ok(())
}

fn check_link(link: &Link, exists: impl Fn(&str) -> bool) -> Result<(), ValidationError> {
	for endpoint in [&link.source, &link.target] {
		if !exists(endpoint) {
			return Err(ValidationError::DanglingLink {
				source_id: link.source.clone(),
				target_id: link.target.clone(),
				missing: endpoint.clone(),
			});
		}
	}
	if link.weight.is_some_and(|w| !w.is_finite()) {
		return Err(ValidationError::NonFinite {
			id: format!("{}->{}", link.source, link.target),
			field: "weight",
		});
	}
	Ok(())
}
