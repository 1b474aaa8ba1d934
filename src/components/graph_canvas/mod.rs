//! Canvas front end for the brain graph engine.
//!
//! Renders the engine's layout onto an HTML canvas with:
//! - Per-frame ticking through `requestAnimationFrame`
//! - Pan, zoom, node dragging and double-click pinning
//! - Selection rings, dimming and smooth hover glows
//! - Configurable theming and zoom-aware scaling
//!
//! # Example
//!
//! ```ignore
//! use brain_graph::{BrainGraphCanvas, GraphData};
//!
//! let data = GraphData::from_json(r#"{
//!     "nodes": [{ "id": "light.kitchen", "type": "entity" }, { "id": "mood.calm", "type": "mood" }],
//!     "links": [{ "source": "mood.calm", "target": "light.kitchen" }]
//! }"#)?;
//!
//! view! { <BrainGraphCanvas data=Signal::stored(data) fullscreen=true /> }
//! ```

mod component;
mod render;
/// Zoom-aware sizing of canvas visuals.
pub mod scale;
/// Colours and styles.
pub mod theme;

pub use component::BrainGraphCanvas;
pub use render::CanvasRenderer;
pub use theme::Theme;
