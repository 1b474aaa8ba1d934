//! Leptos component wrapping the graph canvas.
//!
//! The component creates an HTML canvas element, owns one [`GraphEngine`]
//! and forwards mouse and wheel input to it as [`PointerEvent`]s. An
//! animation loop runs via `requestAnimationFrame`, calling
//! [`GraphEngine::frame`] with the canvas renderer each frame. The loop stops
//! and the engine is destroyed once the canvas leaves the document.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render::CanvasRenderer;
use super::theme::Theme;
use crate::engine::{EngineConfig, GraphData, GraphEngine, PointerEvent, RenderAdapter};

/// Engine plus the canvas it draws on.
struct GraphContext {
	engine: GraphEngine,
	renderer: CanvasRenderer,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Renders an interactive brain graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; every change is merged
/// into the live layout without disturbing persisting nodes. The component
/// sizes itself to its parent container by default; set `fullscreen = true`
/// to fill the viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn BrainGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: EngineConfig,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Show zoom in / zoom out / reset / refresh buttons.
	#[prop(default = true)]
	show_controls: bool,
	#[prop(optional, into)] on_node_selected: Option<Callback<String>>,
	#[prop(optional, into)] on_selection_cleared: Option<Callback<()>>,
	#[prop(optional, into)] on_node_hovered: Option<Callback<Option<String>>>,
	#[prop(optional, into)] on_zoom_changed: Option<Callback<f64>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<GraphContext> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if context_init.borrow().is_none() {
			let Some(window) = web_sys::window() else {
				return;
			};
			let (w, h) = if fullscreen {
				window_size(&window)
			} else {
				(
					width.unwrap_or_else(|| {
						canvas
							.parent_element()
							.map(|p| p.client_width() as f64)
							.unwrap_or(800.0)
					}),
					height.unwrap_or_else(|| {
						canvas
							.parent_element()
							.map(|p| p.client_height() as f64)
							.unwrap_or(600.0)
					}),
				)
			};
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);

			let Some(ctx) = context_2d(&canvas) else {
				warn!("brain-graph: canvas has no 2d context");
				return;
			};

			let mut engine = GraphEngine::new(config.clone().with_size(w, h));
			if let Some(cb) = on_node_selected {
				let _ = engine.on_node_selected(move |id| cb.run(id.to_string()));
			}
			if let Some(cb) = on_selection_cleared {
				let _ = engine.on_selection_cleared(move || cb.run(()));
			}
			if let Some(cb) = on_node_hovered {
				let _ = engine.on_node_hovered(move |id| cb.run(id.map(str::to_string)));
			}
			if let Some(cb) = on_zoom_changed {
				let _ = engine.on_zoom_changed(move |k| cb.run(k));
			}

			*context_init.borrow_mut() = Some(GraphContext {
				engine,
				renderer: CanvasRenderer::new(canvas.clone(), ctx, theme.clone().unwrap_or_default()),
			});

			if fullscreen {
				let context_resize = context_init.clone();
				*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
					let Some(win) = web_sys::window() else {
						return;
					};
					let (nw, nh) = window_size(&win);
					if let Some(ref mut c) = *context_resize.borrow_mut() {
						c.renderer.resize(nw, nh);
						if let Err(e) = c.engine.resize(nw, nh) {
							debug!("brain-graph: resize ignored: {e}");
						}
					}
				}));
				if let Some(ref cb) = *resize_cb_init.borrow() {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}

			let (context_anim, animate_inner, resize_detach) =
				(context_init.clone(), animate_init.clone(), resize_cb_init.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				let mut running = true;
				if let Some(ref mut c) = *context_anim.borrow_mut() {
					if !c.renderer.canvas().is_connected() {
						debug!("brain-graph: canvas detached, destroying engine");
						c.engine.destroy();
						if let (Some(win), Some(cb)) = (web_sys::window(), resize_detach.borrow_mut().take()) {
							let _ = win
								.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
						}
						running = false;
					} else if let Err(e) = c.engine.frame(&mut c.renderer) {
						warn!("brain-graph: frame failed: {e}");
						running = false;
					}
				}
				if running {
					if let Some(ref cb) = *animate_inner.borrow() {
						request_frame(cb);
					}
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				request_frame(cb);
			}
		}

		if let Some(ref mut c) = *context_init.borrow_mut() {
			if let Err(e) = c.engine.set_graph_data(data) {
				warn!("brain-graph: rejected graph data: {e}");
			}
		}
	});

	let pointer = {
		let context = context.clone();
		move |raw: (f64, f64), make: fn(f64, f64) -> PointerEvent| {
			if let Some(ref mut c) = *context.borrow_mut() {
				let (x, y) = c.renderer.pointer_to_screen(raw.0, raw.1);
				let _ = c.engine.pointer(make(x, y));
			}
		}
	};
	let client = |ev: &MouseEvent| (ev.client_x() as f64, ev.client_y() as f64);

	let on_mousedown = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(client(&ev), |x, y| PointerEvent::Down { x, y })
	};
	let on_mousemove = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(client(&ev), |x, y| PointerEvent::Move { x, y })
	};
	let on_mouseup = {
		let pointer = pointer.clone();
		move |ev: MouseEvent| pointer(client(&ev), |x, y| PointerEvent::Up { x, y })
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			let _ = c.engine.pointer(PointerEvent::Leave);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let (x, y) = c
				.renderer
				.pointer_to_screen(ev.client_x() as f64, ev.client_y() as f64);
			let _ = c.engine.pointer(PointerEvent::Wheel {
				x,
				y,
				delta_y: ev.delta_y(),
			});
		}
	};

	// Double-click toggles an explicit pin on the node under the pointer.
	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_dc.borrow_mut() {
			let (sx, sy) = c
				.renderer
				.pointer_to_screen(ev.client_x() as f64, ev.client_y() as f64);
			let hit = c.engine.node_at(sx, sy).ok().flatten();
			let Some((id, fixed)) = hit.map(|n| (n.id.clone(), n.fixed)) else {
				return;
			};
			let (mx, my) = c.renderer.map_pointer_to_model_space(
				ev.client_x() as f64,
				ev.client_y() as f64,
				c.engine.view(),
			);
			let result = if fixed {
				c.engine.release_node(&id)
			} else {
				c.engine.fix_node(&id, mx, my)
			};
			if let Err(e) = result {
				warn!("brain-graph: toggling pin on {id} failed: {e}");
			}
		}
	};

	let control = move |action: fn(&mut GraphEngine)| {
		let context = context.clone();
		move |_: MouseEvent| {
			if let Some(ref mut c) = *context.borrow_mut() {
				action(&mut c.engine);
			}
		}
	};

	view! {
		<div class="brain-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="brain-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style="display: block; cursor: grab;"
			/>
			{show_controls.then(|| view! {
				<div class="brain-graph-controls" style="position: absolute; top: 8px; right: 8px; display: flex; gap: 4px;">
					<button title="Zoom in" on:click={control(|e| { let _ = e.zoom_in(); })}>"+"</button>
					<button title="Zoom out" on:click={control(|e| { let _ = e.zoom_out(); })}>"−"</button>
					<button title="Reset zoom" on:click={control(|e| { let _ = e.reset_zoom(); })}>"⟲"</button>
					<button title="Re-run layout" on:click={control(|e| { let _ = e.refresh(); })}>"↻"</button>
				</div>
			})}
		</div>
	}
}
