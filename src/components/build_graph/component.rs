//! Leptos component hosting the build graph canvas.
//!
//! Renders the container the layout output is injected into, the reset
//! control, and the status legend the viewBox leaves room for. The heavy
//! lifting happens in the renderer; this component only mounts it and
//! feeds it requests.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::info;
use wasm_bindgen_futures::spawn_local;

use super::renderer::{GraphRenderer, InteractionSink, RESET_CONTROL_ID};
use super::types::{GraphRenderRequest, NodeStatus};

/// Interactive build dependency graph.
///
/// Pass render requests via the reactive `request` signal; each change
/// triggers one render pass. Interactions are logged unless a custom sink
/// is wired through [`super::bridge::GraphPorts`] instead.
#[component]
pub fn BuildGraphViewer(
	#[prop(into)] request: Signal<Option<GraphRenderRequest>>,
	#[prop(default = String::from("build-graph-canvas"), into)] container_id: String,
) -> impl IntoView {
	let renderer: Rc<RefCell<Option<Rc<GraphRenderer>>>> = Rc::new(RefCell::new(None));
	let canvas_id = container_id.clone();

	Effect::new(move |_| {
		let Some(req) = request.get() else {
			return;
		};
		let renderer = renderer
			.borrow_mut()
			.get_or_insert_with(|| {
				let sink = InteractionSink::new(|event| {
					info!("build-graph: interaction {event:?}");
				});
				GraphRenderer::new(container_id.clone(), sink)
			})
			.clone();
		spawn_local(async move {
			renderer.draw(req).await;
		});
	});

	let statuses = [
		NodeStatus::Pending,
		NodeStatus::Running,
		NodeStatus::Success,
		NodeStatus::Failure,
		NodeStatus::Canceled,
		NodeStatus::Killed,
		NodeStatus::Skipped,
		NodeStatus::Error,
	];

	view! {
		<div class="build-graph">
			<div class="build-graph-canvas" id=canvas_id></div>
			<div class="build-graph-legend">
				<ul>
					{statuses
						.into_iter()
						.map(|status| {
							let class = format!("build-graph-legend-item {}", status.class_name());
							let label = status.class_name().trim_start_matches('-').to_string();
							view! { <li class=class>{label}</li> }
						})
						.collect_view()}
				</ul>
				<button id=RESET_CONTROL_ID class="build-graph-reset" title="Recenter the diagram">
					"Reset view"
				</button>
			</div>
		</div>
	}
}
