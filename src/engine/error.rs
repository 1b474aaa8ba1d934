//! Error taxonomy for the graph engine.
//!
//! Zoom and pan requests are clamped rather than rejected, and numeric
//! degeneracies inside the simulator are recovered locally, so neither shows
//! up here.

use thiserror::Error;

/// A rejected data mutation. The model is left exactly as it was.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
	/// Two nodes share an id, or an added node collides with an existing one.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	/// A link references a node id that does not exist.
	#[error("link {source_id} -> {target_id} references missing node `{missing}`")]
	DanglingLink {
		source_id: String,
		target_id: String,
		missing: String,
	},
	/// A numeric node or link field is NaN or infinite.
	#[error("field `{field}` of `{id}` is not a finite number")]
	NonFinite { id: String, field: &'static str },
	/// Removal of a node id that is not in the model.
	#[error("unknown node `{0}`")]
	UnknownNode(String),
	/// Removal of a link that is not in the model.
	#[error("no link {source_id} -> {target_id}")]
	UnknownLink { source_id: String, target_id: String },
}

/// Lifecycle violation: the engine was used after `destroy()`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
	/// The engine was destroyed.
	#[error("`{operation}` called on a destroyed graph engine")]
	Destroyed { operation: &'static str },
}

/// Any failure surfaced by [`GraphEngine`](super::GraphEngine).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	State(#[from] StateError),
}

/// Result alias used throughout the engine.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
