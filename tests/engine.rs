//! End-to-end behaviour of the headless engine.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use brain_graph::engine::{
	EngineConfig, EngineError, GraphEngine, GraphEvent, Link, Mark, NodeKind, NodeSpec, Phase,
	PointerEvent, RenderAdapter, RenderFrame, Repulsion, StateError, ValidationError, entities,
};
use serde_json::json;

fn spec(id: &str) -> NodeSpec {
	NodeSpec::new(id, NodeKind::Entity)
}

fn specs(ids: &[&str]) -> Vec<NodeSpec> {
	ids.iter().map(|id| spec(id)).collect()
}

fn settled(nodes: Vec<NodeSpec>, links: Vec<Link>) -> GraphEngine {
	let mut engine = GraphEngine::default();
	engine.set_data(nodes, links).unwrap();
	let ticks = engine.run_until_settled(2000).unwrap();
	assert!(ticks < 2000, "did not settle");
	engine
}

fn positions(engine: &GraphEngine) -> Vec<(String, f64, f64)> {
	engine.nodes().iter().map(|n| (n.id.clone(), n.x, n.y)).collect()
}

fn record(engine: &mut GraphEngine) -> Rc<RefCell<Vec<GraphEvent>>> {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	engine
		.subscribe(move |event| sink.borrow_mut().push(event.clone()))
		.unwrap();
	seen
}

#[test]
fn reapplying_the_same_dataset_changes_nothing() {
	let nodes = specs(&["a", "b", "c"]);
	let links = vec![Link::new("a", "b"), Link::new("b", "c")];
	let mut engine = settled(nodes.clone(), links.clone());
	let before = positions(&engine);

	engine.set_data(nodes, links).unwrap();
	let report = engine.reconcile().unwrap();
	assert!(report.is_noop(), "{report:?}");
	assert_eq!(engine.phase(), Phase::Settled);

	engine.tick().unwrap();
	assert_eq!(positions(&engine), before);
}

#[test]
fn persisting_nodes_are_not_moved_by_reconciliation() {
	let mut engine = settled(
		specs(&["a", "b", "c"]),
		vec![Link::new("a", "b"), Link::new("b", "c")],
	);
	let a = engine.node("a").unwrap().position();
	let b = engine.node("b").unwrap().position();

	engine
		.set_data(
			vec![spec("a").with_label("renamed"), spec("b"), spec("d")],
			vec![Link::new("a", "b"), Link::new("b", "d")],
		)
		.unwrap();
	let report = engine.reconcile().unwrap();

	assert_eq!(report.entered, vec!["d".to_string()]);
	assert_eq!(report.exited, vec!["c".to_string()]);
	assert_eq!(report.updated, vec!["a".to_string()]);
	assert_eq!(engine.node("a").unwrap().position(), a);
	assert_eq!(engine.node("b").unwrap().position(), b);
	assert_eq!(engine.node("a").unwrap().label, "renamed");
	assert_eq!(engine.phase(), Phase::Running);
}

#[test]
fn field_only_updates_do_not_reheat() {
	let mut engine = settled(specs(&["a", "b"]), vec![Link::new("a", "b")]);
	engine
		.set_data(
			vec![spec("a").with_color("#ff0000"), spec("b")],
			vec![Link::new("a", "b")],
		)
		.unwrap();
	let report = engine.reconcile().unwrap();
	assert_eq!(report.updated, vec!["a".to_string()]);
	assert!(!report.needs_reheat());
	assert_eq!(engine.phase(), Phase::Settled);
}

#[test]
fn invalid_dataset_leaves_state_untouched() {
	let mut engine = settled(specs(&["a", "b"]), vec![Link::new("a", "b")]);
	let before = positions(&engine);

	let err = engine
		.set_data(specs(&["a", "b"]), vec![Link::new("a", "zzz")])
		.unwrap_err();
	assert!(matches!(
		err,
		EngineError::Validation(ValidationError::DanglingLink { ref missing, .. }) if missing == "zzz"
	));
	let err = engine.set_data(specs(&["a", "a"]), vec![]).unwrap_err();
	assert_eq!(
		err,
		EngineError::Validation(ValidationError::DuplicateNode("a".into()))
	);

	engine.tick().unwrap();
	assert_eq!(positions(&engine), before);
	assert_eq!(engine.links().len(), 1);
}

#[test]
fn staged_mutations_apply_at_the_next_tick() {
	let mut engine = GraphEngine::default();
	engine.add_node(spec("a")).unwrap();
	engine.add_node(spec("b")).unwrap();
	engine.add_link(Link::new("a", "b")).unwrap();
	assert!(engine.nodes().is_empty());

	engine.tick().unwrap();
	assert_eq!(engine.nodes().len(), 2);
	assert_eq!(engine.links().len(), 1);

	engine.remove_node("b").unwrap();
	assert_eq!(engine.nodes().len(), 2);
	engine.tick().unwrap();
	assert_eq!(engine.nodes().len(), 1);
	assert!(engine.links().is_empty());
	assert_eq!(
		engine.remove_link("a", "b").unwrap_err(),
		EngineError::Validation(ValidationError::UnknownLink {
			source_id: "a".into(),
			target_id: "b".into(),
		})
	);
}

#[test]
fn dragging_pins_then_releases_the_node() {
	let mut engine = settled(specs(&["a", "b"]), vec![Link::new("a", "b")]);
	let (ax, ay) = engine.node("a").unwrap().position();

	engine.pointer(PointerEvent::Down { x: ax, y: ay }).unwrap();
	engine.pointer(PointerEvent::Move { x: 10.0, y: 20.0 }).unwrap();
	engine.tick().unwrap();

	let a = engine.node("a").unwrap();
	assert_eq!((a.fx, a.fy), (Some(10.0), Some(20.0)));
	assert_eq!(a.position(), (10.0, 20.0));
	assert_eq!(engine.simulation().alpha_target, 0.3);
	assert_eq!(engine.phase(), Phase::Running);

	engine.pointer(PointerEvent::Up { x: 10.0, y: 20.0 }).unwrap();
	engine.tick().unwrap();

	let a = engine.node("a").unwrap();
	assert_eq!((a.fx, a.fy), (None, None));
	assert_eq!(engine.simulation().alpha_target, 0.0);
	assert!(engine.simulation().alpha > engine.simulation().alpha_min);
	assert_eq!(engine.phase(), Phase::Running);
	// Long drags are not clicks.
	assert_eq!(engine.selection().selected, None);
}

#[test]
fn explicitly_fixed_node_stays_pinned_after_drag() {
	let mut engine = settled(specs(&["a", "b"]), vec![Link::new("a", "b")]);
	engine.fix_node("b", 600.0, 100.0).unwrap();
	engine.tick().unwrap();

	engine.pointer(PointerEvent::Down { x: 600.0, y: 100.0 }).unwrap();
	engine.pointer(PointerEvent::Move { x: 650.0, y: 120.0 }).unwrap();
	engine.pointer(PointerEvent::Up { x: 650.0, y: 120.0 }).unwrap();
	engine.tick().unwrap();

	let b = engine.node("b").unwrap();
	assert!(b.fixed);
	assert_eq!((b.fx, b.fy), (Some(650.0), Some(120.0)));

	engine.release_node("b").unwrap();
	let b = engine.node("b").unwrap();
	assert!(!b.fixed && !b.is_pinned());
}

#[test]
fn click_selects_and_notifies() {
	let mut engine = settled(
		specs(&["a", "b", "c"]),
		vec![Link::new("a", "b")],
	);
	let selected = Rc::new(RefCell::new(Vec::new()));
	let sink = selected.clone();
	engine
		.on_node_selected(move |id| sink.borrow_mut().push(id.to_string()))
		.unwrap();

	let (bx, by) = engine.node("b").unwrap().position();
	engine.pointer(PointerEvent::Down { x: bx, y: by }).unwrap();
	engine.pointer(PointerEvent::Up { x: bx + 1.0, y: by + 1.0 }).unwrap();
	engine.tick().unwrap();

	assert_eq!(*selected.borrow(), vec!["b".to_string()]);
	assert_eq!(engine.selection().selected.as_deref(), Some("b"));
	assert_eq!(engine.node("b").unwrap().mark, Mark::Selected);
	assert_eq!(engine.node("a").unwrap().mark, Mark::Related);
	assert_eq!(engine.node("c").unwrap().mark, Mark::Dimmed);
}

#[test]
fn removing_the_selected_node_clears_selection() {
	let mut engine = settled(specs(&["a", "b"]), vec![Link::new("a", "b")]);
	let events = record(&mut engine);
	engine.select("a").unwrap();
	engine.set_data(specs(&["b"]), vec![]).unwrap();
	engine.tick().unwrap();

	assert_eq!(engine.selection().selected, None);
	assert_eq!(
		*events.borrow(),
		vec![
			GraphEvent::NodeSelected("a".into()),
			GraphEvent::SelectionCleared,
		]
	);
	assert_eq!(engine.node("b").unwrap().mark, Mark::Normal);
	assert!(matches!(
		engine.select("a"),
		Err(EngineError::Validation(ValidationError::UnknownNode(_)))
	));
}

#[test]
fn zoom_is_clamped_and_reported_only_on_change() {
	let mut engine = GraphEngine::default();
	let scales = Rc::new(RefCell::new(Vec::new()));
	let sink = scales.clone();
	engine.on_zoom_changed(move |k| sink.borrow_mut().push(k)).unwrap();

	for _ in 0..100 {
		engine.zoom_in().unwrap();
	}
	assert_eq!(engine.view().scale(), 4.0);
	let changes = scales.borrow().len();
	assert!(changes > 0 && changes < 100);
	assert_eq!(scales.borrow().last(), Some(&4.0));

	for _ in 0..100 {
		engine.zoom_out().unwrap();
	}
	assert_eq!(engine.view().scale(), 0.1);

	assert_eq!(engine.reset_zoom().unwrap(), 1.0);
	assert_eq!((engine.view().pan_x, engine.view().pan_y), (0.0, 0.0));
}

#[test]
fn wheel_zooms_about_the_pointer() {
	let mut engine = GraphEngine::default();
	let events = record(&mut engine);
	engine
		.pointer(PointerEvent::Wheel { x: 100.0, y: 50.0, delta_y: -120.0 })
		.unwrap();
	engine.tick().unwrap();

	assert!((engine.view().scale() - 1.1).abs() < 1e-12);
	let (sx, sy) = engine.view().model_to_screen(100.0, 50.0);
	assert!((sx - 100.0).abs() < 1e-9 && (sy - 50.0).abs() < 1e-9);
	assert_eq!(events.borrow().len(), 1);
	assert!(matches!(events.borrow()[0], GraphEvent::ZoomChanged(_)));
}

#[test]
fn destroyed_engine_rejects_mutation() {
	let mut engine = settled(specs(&["a"]), vec![]);
	let listener = engine.on_zoom_changed(|_| {}).unwrap();
	engine.destroy();
	engine.destroy();

	assert!(engine.is_destroyed());
	assert!(engine.nodes().is_empty());
	assert_eq!(
		engine.set_data(specs(&["a"]), vec![]),
		Err(EngineError::State(StateError::Destroyed {
			operation: "set_data"
		}))
	);
	assert!(matches!(
		engine.tick(),
		Err(EngineError::State(StateError::Destroyed { .. }))
	));
	assert!(engine.zoom_in().is_err());
	assert!(engine.pointer(PointerEvent::Leave).is_err());
	assert!(matches!(
		engine.unsubscribe(listener),
		Err(EngineError::State(StateError::Destroyed { operation: "unsubscribe" }))
	));
	assert!(engine.node_at(0.0, 0.0).is_err());
	assert!(engine.resize(1024.0, 768.0).is_err());
	assert!(engine.render_frame().is_err());
}

#[test]
fn late_draw_after_destroy_fails_without_touching_adapter() {
	let mut engine = settled(specs(&["a", "b"]), vec![Link::new("a", "b")]);
	engine.destroy();
	let mut recorder = Recorder::default();

	assert!(matches!(
		engine.draw(&mut recorder),
		Err(EngineError::State(StateError::Destroyed { operation: "render_frame" }))
	));
	assert!(engine.frame(&mut recorder).is_err());
	assert!(recorder.calls.is_empty());
}

#[test]
fn barnes_hut_engine_settles_with_finite_positions() {
	let mut config = EngineConfig::default();
	config.simulation.repulsion = Repulsion::BarnesHut { theta: 0.8 };
	let mut engine = GraphEngine::new(config);

	let ids: Vec<String> = (0..40).map(|i| format!("n{i}")).collect();
	let nodes = ids.iter().map(|id| spec(id)).collect();
	let links = ids
		.windows(2)
		.map(|pair| Link::new(pair[0].as_str(), pair[1].as_str()))
		.collect();
	engine.set_data(nodes, links).unwrap();

	let ticks = engine.run_until_settled(2000).unwrap();
	assert!((300..=400).contains(&ticks), "settled after {ticks}");
	for node in engine.nodes() {
		assert!(node.x.is_finite() && node.y.is_finite(), "{node:?}");
	}
}

#[test]
fn entity_map_round_trips_into_the_engine() {
	let entities: BTreeMap<String, serde_json::Value> = [
		("light.a", json!({ "state": { "state": "on" } })),
		("light.b", json!({ "state": { "state": "off" } })),
		("switch.c", json!({ "state": { "state": "on" } })),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v))
	.collect();

	let mut engine = GraphEngine::default();
	engine
		.set_graph_data(entities::graph_from_entities(&entities))
		.unwrap();
	let report = engine.reconcile().unwrap();
	assert_eq!(report.entered.len(), 3);
	assert_eq!(report.links_added, 1);
	assert_eq!(engine.links()[0].link.kind.as_deref(), Some("domain"));
}

#[derive(Default)]
struct Recorder {
	calls: Vec<&'static str>,
	nodes: usize,
	links: usize,
}

impl RenderAdapter for Recorder {
	fn begin_frame(&mut self, _frame: &RenderFrame<'_>) {
		self.calls.push("begin");
	}

	fn draw_links(&mut self, frame: &RenderFrame<'_>) {
		self.calls.push("links");
		self.links = frame.links.len();
	}

	fn draw_nodes(&mut self, frame: &RenderFrame<'_>) {
		self.calls.push("nodes");
		self.nodes = frame.nodes.len();
	}

	fn end_frame(&mut self, _frame: &RenderFrame<'_>) {
		self.calls.push("end");
	}

	fn pointer_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x - 10.0, y - 10.0)
	}
}

#[test]
fn frame_draws_links_under_nodes() {
	let mut engine = GraphEngine::default();
	engine
		.set_data(specs(&["a", "b"]), vec![Link::new("a", "b")])
		.unwrap();
	let mut recorder = Recorder::default();
	engine.frame(&mut recorder).unwrap();

	assert_eq!(recorder.calls, ["begin", "links", "nodes", "end"]);
	assert_eq!((recorder.nodes, recorder.links), (2, 1));

	engine.zoom_in().unwrap();
	let (mx, my) = recorder.map_pointer_to_model_space(130.0, 70.0, engine.view());
	assert!((mx - 100.0).abs() < 1e-9 && (my - 50.0).abs() < 1e-9);
}
