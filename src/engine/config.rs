//! Engine configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a host page can
//! supply a partial JSON document (only the values it wants to override) and
//! the rest falls back to the defaults below.

use serde::Deserialize;

/// How pairwise repulsion is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Repulsion {
	/// Exact O(n²) evaluation over every unordered pair.
	#[default]
	AllPairs,
	/// Quadtree approximation. Cells whose width / distance ratio is below
	/// `theta` are treated as a single body at their centre of mass.
	BarnesHut { theta: f64 },
}

/// Force and cooling parameters for the physics simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Fraction of the remaining distance to `alpha_target` lost per tick.
	pub alpha_decay: f64,
	/// Below this alpha the simulation settles.
	pub alpha_min: f64,
	/// Velocity multiplier applied after every integration step.
	pub velocity_decay: f64,
	/// Alpha set by a dataset reheat.
	pub reheat_alpha: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Link stiffness.
	pub spring_constant: f64,
	/// Spring rest length for unweighted links.
	pub rest_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Distance floor for repulsion, guarding against coincident nodes.
	pub min_distance: f64,
	/// Pull of the node centroid towards the viewport centre.
	pub centering_strength: f64,
	/// Integration step.
	pub time_step: f64,
	pub repulsion: Repulsion,
	/// Max per-axis offset of entering nodes from the centroid.
	pub entry_jitter: f64,
}

impl SimulationConfig {
	/// Decay that takes alpha from 1 to `alpha_min` in `ticks` ticks.
	pub fn decay_for_ticks(alpha_min: f64, ticks: u32) -> f64 {
		1.0 - alpha_min.powf(1.0 / ticks as f64)
	}
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha_decay: Self::decay_for_ticks(0.001, 300),
			alpha_min: 0.001,
			velocity_decay: 0.6,
			reheat_alpha: 1.0,
			drag_alpha_target: 0.3,
			spring_constant: 0.1,
			rest_distance: 100.0,
			charge_strength: -30.0,
			min_distance: 1.0,
			centering_strength: 0.05,
			time_step: 1.0,
			repulsion: Repulsion::default(),
			entry_jitter: 10.0,
		}
	}
}

/// Pan/zoom limits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Factor used by the zoom in/out buttons.
	pub zoom_factor: f64,
	/// Factor per wheel notch.
	pub wheel_zoom_factor: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 4.0,
			zoom_factor: 1.2,
			wheel_zoom_factor: 1.1,
		}
	}
}

/// Pointer gesture tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Max screen-space travel (px) for a press/release to count as a click.
	pub click_threshold: f64,
	/// Extra screen-space margin (px) around a node's radius for hit tests.
	pub hit_slop: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			click_threshold: 3.0,
			hit_slop: 4.0,
		}
	}
}

/// Radius derivation for nodes without an explicit size.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeSizing {
	/// Radius of a node with no value.
	pub base_radius: f64,
	/// Radius added per unit of `value`.
	pub value_scale: f64,
	pub min_radius: f64,
	/// Ceiling for any resolved radius, so outsized values stay hit-testable.
	pub max_radius: f64,
}

impl Default for NodeSizing {
	fn default() -> Self {
		Self {
			base_radius: 15.0,
			value_scale: 2.0,
			min_radius: 1.0,
			max_radius: 120.0,
		}
	}
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Viewport width. The simulation centres nodes on `width / 2`.
	pub width: f64,
	/// Viewport height. The simulation centres nodes on `height / 2`.
	pub height: f64,
	/// Seed for entry jitter, so layouts are reproducible.
	pub seed: u64,
	pub simulation: SimulationConfig,
	pub view: ViewConfig,
	pub interaction: InteractionConfig,
	pub sizing: NodeSizing,
}

impl EngineConfig {
	/// Same configuration for a different viewport.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	/// Model-space point the centering force pulls towards.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Parses a (possibly partial) JSON document.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			seed: 0x5eed,
			simulation: SimulationConfig::default(),
			view: ViewConfig::default(),
			interaction: InteractionConfig::default(),
			sizing: NodeSizing::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_decay_matches_three_hundred_tick_schedule() {
		let decay = SimulationConfig::default().alpha_decay;
		assert!((decay - 0.0228).abs() < 1e-4, "decay = {decay}");
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let cfg = EngineConfig::from_json(
			r#"{ "width": 1024, "simulation": { "charge_strength": -80, "repulsion": { "strategy": "barnes_hut", "theta": 0.7 } } }"#,
		)
		.unwrap();
		assert_eq!(cfg.width, 1024.0);
		assert_eq!(cfg.height, 600.0);
		assert_eq!(cfg.simulation.charge_strength, -80.0);
		assert_eq!(cfg.simulation.repulsion, Repulsion::BarnesHut { theta: 0.7 });
		assert_eq!(cfg.simulation.rest_distance, 100.0);
		assert_eq!(cfg.view, ViewConfig::default());
	}
}
