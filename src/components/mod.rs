//! UI components.

/// Canvas front end for the engine.
pub mod graph_canvas;
