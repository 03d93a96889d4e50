//! Draw pipeline orchestration for one build graph container.
//!
//! One renderer owns the cross-draw state for one container element: the
//! redraw coordinator, the viewport transform, the closures of the current
//! draw, and the outbound interaction sink. Each render pass is
//! fire-and-forget; a pass whose layout resolves after a newer request has
//! started is discarded.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;

use super::decorate;
use super::dom::{self, DrawHandles, ViewportShared};
use super::layout;
use super::state::RedrawCoordinator;
use super::types::{GraphRenderRequest, InteractionEvent};
use super::viewport::recenter_transform;

/// Element id of the external "reset view" control.
pub const RESET_CONTROL_ID: &str = "build-graph-reset";

/// Outbound interaction channel.
///
/// Delivery is deferred to the next scheduling tick rather than invoked
/// synchronously inside a DOM event handler, so the owning application
/// never re-enters the diagram while its own handler is still running.
#[derive(Clone)]
pub struct InteractionSink {
	handler: Rc<dyn Fn(InteractionEvent)>,
}

impl InteractionSink {
	pub fn new(handler: impl Fn(InteractionEvent) + 'static) -> Self {
		Self {
			handler: Rc::new(handler),
		}
	}

	/// Queue one event for delivery on the next tick.
	pub fn emit(&self, event: InteractionEvent) {
		let handler = self.handler.clone();
		spawn_local(async move {
			handler(event);
		});
	}
}

/// Renders build graphs into one container element.
pub struct GraphRenderer {
	container_id: String,
	coordinator: RefCell<RedrawCoordinator>,
	shared: Rc<ViewportShared>,
	handles: RefCell<DrawHandles>,
	generation: Cell<u64>,
	sink: InteractionSink,
	reset_control: RefCell<Option<Closure<dyn FnMut(Event)>>>,
}

impl GraphRenderer {
	/// Create a renderer for the container with the given element id and
	/// bind the external reset control, if present.
	pub fn new(container_id: impl Into<String>, sink: InteractionSink) -> Rc<Self> {
		let renderer = Rc::new(Self {
			container_id: container_id.into(),
			coordinator: RefCell::new(RedrawCoordinator::new()),
			shared: Rc::new(ViewportShared::default()),
			handles: RefCell::new(DrawHandles::default()),
			generation: Cell::new(0),
			sink,
			reset_control: RefCell::new(None),
		});
		renderer.bind_reset_control();
		renderer
	}

	/// Run one full render pass for `request`.
	///
	/// Aborts silently when there is nothing to draw into (no container,
	/// no generated root); logs and aborts when the layout engine rejects.
	pub async fn draw(&self, request: GraphRenderRequest) {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);

		let decision = self.coordinator.borrow().decide(&request);

		let markup = match layout::layout_dot(&request.graph_text).await {
			Ok(markup) => markup,
			Err(e) => {
				warn!("build-graph: layout engine rejected the graph: {e:?}");
				return;
			}
		};

		// A newer request started while this layout was computing; its
		// draw owns the container now.
		if self.generation.get() != generation {
			debug!(
				"build-graph: discarding stale layout for build {}",
				request.build_id
			);
			return;
		}

		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return;
		};
		let Some(container) = document.get_element_by_id(&self.container_id) else {
			return;
		};
		container.set_inner_html(&markup);

		let Some((summary, scanned)) = dom::scan(&container) else {
			return;
		};

		let plan = decorate::plan(&summary, &request);
		let handles = dom::apply(&document, &scanned, &plan, &self.sink, &self.shared);

		let content = dom::content_box(&scanned);
		self.shared.set_content(content);
		if decision.recenter {
			self.shared.set_transform(recenter_transform(content));
		}
		dom::apply_viewport(&scanned, &self.shared);

		// The pass rendered; only now does the session count as drawn.
		self.coordinator.borrow_mut().commit(&request);

		*self.handles.borrow_mut() = handles;
		debug!(
			"build-graph: drew build {} ({} nodes, {} edges, recenter={})",
			request.build_id,
			summary.nodes.len(),
			summary.edges.len(),
			decision.recenter
		);
	}

	/// The manual "reset view" action performs the same recenter operation
	/// as a fresh draw, on demand.
	fn bind_reset_control(&self) {
		let Some(control) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(RESET_CONTROL_ID))
		else {
			return;
		};
		let shared = self.shared.clone();
		let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			ev.prevent_default();
			shared.recenter();
		});
		let _ = control.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
		*self.reset_control.borrow_mut() = Some(closure);
	}
}
