//! Port bridge: the message-passing boundary to the owning application.
//!
//! The owning dashboard drives rendering through `renderBuildGraph` and
//! receives interaction events through the callback registered with
//! `onInteraction`. Rendering is fire-and-forget; event delivery is
//! deferred to the next tick and carries the JSON shapes the owning
//! application expects (`event_type` tagged objects).

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use log::warn;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;

use super::renderer::{GraphRenderer, InteractionSink};
use super::types::GraphRenderRequest;

/// JS-facing handle pairing one renderer with one outbound callback.
#[wasm_bindgen]
pub struct GraphPorts {
	renderer: Rc<GraphRenderer>,
	callback: Rc<RefCell<Option<Function>>>,
}

#[wasm_bindgen]
impl GraphPorts {
	/// Create the bridge for the container with the given element id.
	#[wasm_bindgen(constructor)]
	pub fn new(container_id: String) -> GraphPorts {
		let callback: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));

		let outbound = callback.clone();
		let sink = InteractionSink::new(move |event| {
			let Some(function) = outbound.borrow().clone() else {
				return;
			};
			match serde_wasm_bindgen::to_value(&event) {
				Ok(value) => {
					if let Err(e) = function.call1(&JsValue::NULL, &value) {
						warn!("build-graph: interaction callback threw: {e:?}");
					}
				}
				Err(e) => warn!("build-graph: could not serialize interaction event: {e}"),
			}
		});

		GraphPorts {
			renderer: GraphRenderer::new(container_id, sink),
			callback,
		}
	}

	/// Register the outbound interaction callback.
	#[wasm_bindgen(js_name = onInteraction)]
	pub fn on_interaction(&self, callback: Function) {
		*self.callback.borrow_mut() = Some(callback);
	}

	/// Inbound render command. Validates the request shape, then schedules
	/// one render pass and returns immediately.
	#[wasm_bindgen(js_name = renderBuildGraph)]
	pub fn render_build_graph(&self, request: JsValue) -> Result<(), JsValue> {
		let request: GraphRenderRequest = serde_wasm_bindgen::from_value(request)
			.map_err(|e| JsValue::from_str(&format!("invalid render request: {e}")))?;
		let renderer = self.renderer.clone();
		spawn_local(async move {
			renderer.draw(request).await;
		});
		Ok(())
	}
}
