//! brain-graph: incremental force-directed visualization of a home's "brain".
//!
//! The [`engine`] module holds the renderer-agnostic core: graph model,
//! reconciliation of new data against the live layout, physics, pointer
//! interaction, view transform and event notifications. The
//! [`components`] module drives it from a Leptos canvas component.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// Leptos components.
pub mod components;
/// Headless graph engine.
pub mod engine;

pub use components::graph_canvas::{BrainGraphCanvas, CanvasRenderer, Theme};
pub use engine::{EngineConfig, EngineError, GraphData, GraphEngine, LinkDto, NodeDto};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("brain-graph: logging initialized");
}

fn script_element(id: &str) -> Option<HtmlScriptElement> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	document.get_element_by_id(id)?.dyn_into().ok()
}

fn script_text(id: &str) -> Option<String> {
	script_element(id)?.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }.
///
/// Falls back to a raw entity map in id="graph-entities", linked by domain.
fn load_graph_data() -> Option<GraphData> {
	if let Some(json_text) = script_text("graph-data") {
		return match GraphData::from_json(&json_text) {
			Ok(data) => {
				info!(
					"brain-graph: loaded {} nodes, {} links",
					data.nodes.len(),
					data.links.len()
				);
				Some(data)
			}
			Err(e) => {
				warn!("brain-graph: failed to parse graph data: {}", e);
				None
			}
		};
	}

	let json_text = script_text("graph-entities")?;
	match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&json_text) {
		Ok(entities) => {
			let data = engine::entities::graph_from_entities(&entities);
			info!(
				"brain-graph: built {} nodes, {} links from entity states",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("brain-graph: failed to parse entity states: {}", e);
			None
		}
	}
}

/// Load engine tunables from a script element with id="graph-config".
/// Missing fields keep their defaults.
fn load_engine_config() -> EngineConfig {
	let Some(json_text) = script_text("graph-config") else {
		return EngineConfig::default();
	};
	EngineConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("brain-graph: failed to parse graph config, using defaults: {}", e);
		EngineConfig::default()
	})
}

/// Theme named by the `data-theme` attribute of the graph-data script.
fn load_theme() -> Theme {
	script_element("graph-data")
		.and_then(|el| el.get_attribute("data-theme"))
		.and_then(|name| Theme::by_name(&name))
		.unwrap_or_default()
}

/// Main application component.
/// Loads graph data from the DOM and renders the brain graph with a small
/// overlay naming the selected and hovered nodes.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_engine_config();
	let theme = load_theme();
	let theme_name = theme.name;

	let (selected, set_selected) = signal(None::<String>);
	let (hovered, set_hovered) = signal(None::<String>);
	let status = move || {
		let selected = selected.get();
		let hovered = hovered.get();
		match (selected, hovered) {
			(_, Some(h)) => format!("Hovering {h}"),
			(Some(s), None) => format!("Selected {s}"),
			(None, None) => "Click a node to highlight its neighbours.".to_string(),
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Brain Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<BrainGraphCanvas
				data=graph_signal
				config=config
				theme=theme
				fullscreen=true
				on_node_selected={move |id: String| set_selected.set(Some(id))}
				on_selection_cleared={move |_: ()| set_selected.set(None)}
				on_node_hovered={move |id: Option<String>| set_hovered.set(id)}
			/>
			<div class="graph-overlay">
				<h1>"Brain Graph"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Double-click to pin. Scroll to zoom. Drag background to pan."
				</p>
				<p class="status">{status}</p>
			</div>
		</div>
	}
}
