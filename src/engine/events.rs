//! Host notifications.
//!
//! Emitting is fire-and-forget: with no listeners registered, events are
//! dropped. Listeners run synchronously, in registration order, after the
//! engine operation that produced them has finished mutating state.

use log::trace;

/// Something the host application may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// A node was selected by click or by `select()`.
	NodeSelected(String),
	/// The selection was cleared, explicitly or because the node exited.
	SelectionCleared,
	/// The pointer entered (`Some`) or left (`None`) a node.
	NodeHovered(Option<String>),
	/// The view scale changed.
	ZoomChanged(f64),
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&GraphEvent)>;

/// Synchronous single-threaded listener registry.
#[derive(Default)]
pub(crate) struct EventBus {
	listeners: Vec<(ListenerId, Listener)>,
	next_id: u64,
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener for every event.
	pub fn subscribe(&mut self, listener: impl FnMut(&GraphEvent) + 'static) -> ListenerId {
		let id = ListenerId(self.next_id);
		self.next_id += 1;
		self.listeners.push((id, Box::new(listener)));
		id
	}

	/// Returns false if `id` was not registered.
	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(lid, _)| *lid != id);
		self.listeners.len() != before
	}

	pub fn on_node_selected(&mut self, mut f: impl FnMut(&str) + 'static) -> ListenerId {
		self.subscribe(move |event| {
			if let GraphEvent::NodeSelected(id) = event {
				f(id);
			}
		})
	}

	pub fn on_selection_cleared(&mut self, mut f: impl FnMut() + 'static) -> ListenerId {
		self.subscribe(move |event| {
			if matches!(event, GraphEvent::SelectionCleared) {
				f();
			}
		})
	}

	pub fn on_node_hovered(&mut self, mut f: impl FnMut(Option<&str>) + 'static) -> ListenerId {
		self.subscribe(move |event| {
			if let GraphEvent::NodeHovered(id) = event {
				f(id.as_deref());
			}
		})
	}

	pub fn on_zoom_changed(&mut self, mut f: impl FnMut(f64) + 'static) -> ListenerId {
		self.subscribe(move |event| {
			if let GraphEvent::ZoomChanged(scale) = event {
				f(*scale);
			}
		})
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	pub fn emit(&mut self, event: &GraphEvent) {
		trace!("event {event:?} -> {} listeners", self.listeners.len());
		for (_, listener) in &mut self.listeners {
			listener(event);
		}
	}

	/// Emits a batch in order.
	pub fn emit_all(&mut self, events: impl IntoIterator<Item = GraphEvent>) {
		for event in events {
			self.emit(&event);
		}
	}

	pub(crate) fn clear(&mut self) {
		self.listeners.clear();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;

	#[test]
	fn emit_without_listeners_is_a_noop() {
		let mut bus = EventBus::new();
		bus.emit(&GraphEvent::SelectionCleared);
		assert_eq!(bus.listener_count(), 0);
	}

	#[test]
	fn typed_listeners_only_see_their_event() {
		let mut bus = EventBus::new();
		let seen = Rc::new(RefCell::new(Vec::new()));

		let s = seen.clone();
		bus.on_node_selected(move |id| s.borrow_mut().push(format!("selected {id}")));
		let s = seen.clone();
		bus.on_zoom_changed(move |k| s.borrow_mut().push(format!("zoom {k}")));
		let s = seen.clone();
		let hover = bus.on_node_hovered(move |id| s.borrow_mut().push(format!("hover {id:?}")));

		bus.emit_all([
			GraphEvent::NodeHovered(Some("a".into())),
			GraphEvent::NodeSelected("a".into()),
			GraphEvent::ZoomChanged(1.2),
		]);
		assert!(bus.unsubscribe(hover));
		assert!(!bus.unsubscribe(hover));
		bus.emit(&GraphEvent::NodeHovered(None));

		assert_eq!(
			*seen.borrow(),
			vec![
				"hover Some(\"a\")".to_string(),
				"selected a".to_string(),
				"zoom 1.2".to_string(),
			]
		);
	}
}
