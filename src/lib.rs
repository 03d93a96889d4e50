//! build-graph: interactive build dependency graph rendering for the CI
//! dashboard.
//!
//! This crate is the WASM rendering core behind the dashboard's build
//! graph view: it drives the external layout engine, decorates the
//! generated diagram with status, focus, and hover semantics, and bridges
//! clicks back to the owning application as structured events.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::build_graph::{
	BuildGraphViewer, GraphPorts, GraphRenderRequest, InteractionEvent, NodeStatus,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("build-graph: logging initialized");
}

/// Load the initial render request from a script element with
/// id="graph-data". Expected format: the same JSON object the owning
/// application sends through the port bridge.
fn load_render_request() -> Option<GraphRenderRequest> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphRenderRequest>(&json_text) {
		Ok(request) => {
			info!("build-graph: loaded request for build {}", request.build_id);
			Some(request)
		}
		Err(e) => {
			warn!("build-graph: failed to parse render request: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the initial render request from the DOM and mounts the viewer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let request = load_render_request();
	let request_signal = Signal::derive(move || request.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Build Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<BuildGraphViewer request=request_signal />
			<div class="graph-overlay">
				<h1>"Build Graph"</h1>
				<p class="subtitle">
					"Scroll to zoom. Drag the backdrop to pan. Click a node to open it."
				</p>
			</div>
		</div>
	}
}
