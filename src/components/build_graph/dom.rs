//! web-sys adapter between the pure decoration planner and the real SVG.
//!
//! Scans the layout engine's generated markup into a [`MarkupSummary`],
//! applies a [`DecorationPlan`] back onto the live elements, and wires the
//! hover, click, pan, and zoom closures. All policy lives in the pure
//! modules; this file only moves data across the DOM boundary.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Document, Element, Event, MouseEvent, WheelEvent};

use super::decorate::{Binding, DecorationPlan, MarkupEdge, MarkupNode, MarkupStep, MarkupSummary, incident_edges};
use super::renderer::InteractionSink;
use super::types::{CLASS_HOVER, InteractionEvent};
use super::viewport::{
	ContentBox, ViewTransform, client_to_user, padded_view_box, recenter_transform, wheel_zoom,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// In-progress backdrop pan gesture.
#[derive(Clone, Copy, Debug, Default)]
struct PanState {
	active: bool,
	start: (f64, f64),
	origin: (f64, f64),
}

/// Viewport state shared between the renderer and the gesture closures.
///
/// The transform survives across draws (a same-build refresh must not move
/// the view); the element references are replaced on every draw.
#[derive(Default)]
pub struct ViewportShared {
	transform: Cell<ViewTransform>,
	content: Cell<ContentBox>,
	pan: RefCell<PanState>,
	root_group: RefCell<Option<Element>>,
}

impl ViewportShared {
	/// Current transform, sanitized.
	pub fn transform(&self) -> ViewTransform {
		self.transform.get().sanitized()
	}

	/// Replace the transform and push it to the root group.
	pub fn set_transform(&self, transform: ViewTransform) {
		self.transform.set(transform.sanitized());
		self.apply_transform();
	}

	/// Record the content box of the current draw.
	pub fn set_content(&self, content: ContentBox) {
		self.content.set(content);
	}

	/// Reset scale and recenter on the current content box.
	pub fn recenter(&self) {
		self.set_transform(recenter_transform(self.content.get()));
	}

	fn apply_transform(&self) {
		if let Some(group) = self.root_group.borrow().as_ref() {
			let _ = group.set_attribute("transform", &self.transform().to_svg());
		}
	}
}

/// Live element references gathered while scanning, index-aligned with the
/// [`MarkupSummary`] handed to the planner.
pub struct ScannedElements {
	/// The `<svg>` element produced by the layout engine.
	pub svg: Element,
	/// The diagram's root group, target of the zoom transform.
	pub root_group: Element,
	nodes: Vec<NodeElements>,
	/// Edge path elements, one per scanned edge.
	edges: Vec<Element>,
}

struct NodeElements {
	group: Element,
	link: Option<Element>,
	steps: Vec<Element>,
}

/// Closures kept alive for the lifetime of one draw.
///
/// Dropped (and therefore detached) when the next draw replaces them.
#[derive(Default)]
pub struct DrawHandles {
	events: Vec<Closure<dyn FnMut(Event)>>,
	mouse: Vec<Closure<dyn FnMut(MouseEvent)>>,
	wheel: Vec<Closure<dyn FnMut(WheelEvent)>>,
}

/// Scan the generated markup under `container`.
///
/// Returns `None` when the layout engine produced no usable root — that is
/// "nothing to draw yet", and the whole render pass aborts silently.
pub fn scan(container: &Element) -> Option<(MarkupSummary, ScannedElements)> {
	let svg = container.query_selector("svg").ok()??;
	let root_group = svg.query_selector("g").ok()??;

	let mut summary = MarkupSummary::default();
	let mut nodes = Vec::new();
	let mut edges = Vec::new();

	for group in select_all(&root_group, "g.node") {
		let raw_id = title_text(&group);
		let mut node = MarkupNode {
			raw_id: raw_id.clone(),
			bbox: bounding_box(&group),
			in_service_cluster: in_service_cluster(&group),
			has_link: false,
			steps: Vec::new(),
		};
		let mut elements = NodeElements {
			group: group.clone(),
			link: None,
			steps: Vec::new(),
		};

		// The node's own link wrapper carries the node identifier as its
		// title; every other anchor is a step cell.
		for anchor in select_all(&group, "a") {
			let anchor_title = link_title(&anchor);
			if elements.link.is_none() && anchor_title == raw_id {
				node.has_link = true;
				elements.link = Some(anchor);
				continue;
			}
			let label = anchor
				.query_selector("text")
				.ok()
				.flatten()
				.unwrap_or_else(|| anchor.clone());
			node.steps.push(MarkupStep {
				raw_title: anchor_title,
				href: link_href(&anchor),
				label_box: bounding_box(&label),
			});
			elements.steps.push(anchor);
		}

		summary.nodes.push(node);
		nodes.push(elements);
	}

	for group in select_all(&root_group, "g.edge") {
		let Some(path) = group.query_selector("path").ok().flatten() else {
			continue;
		};
		summary.edges.push(MarkupEdge {
			raw_id: title_text(&group),
		});
		edges.push(path);
	}

	Some((
		summary,
		ScannedElements {
			svg,
			root_group,
			nodes,
			edges,
		},
	))
}

/// Content box of the scanned diagram, for recentering and the viewBox.
pub fn content_box(scanned: &ScannedElements) -> ContentBox {
	bounding_box(&scanned.root_group)
}

/// Apply a decoration plan to the scanned elements and wire all closures.
pub fn apply(
	document: &Document,
	scanned: &ScannedElements,
	plan: &DecorationPlan,
	sink: &InteractionSink,
	shared: &Rc<ViewportShared>,
) -> DrawHandles {
	let mut handles = DrawHandles::default();
	let mut outlines: Vec<Option<Element>> = vec![None; scanned.nodes.len()];

	for op in &plan.node_ops {
		let Some(node) = scanned.nodes.get(op.index) else {
			continue;
		};
		if let Some(outline) = make_svg_element(document, "rect") {
			let _ = outline.set_attribute("x", &op.outline.x.to_string());
			let _ = outline.set_attribute("y", &op.outline.y.to_string());
			let _ = outline.set_attribute("width", &op.outline.width.to_string());
			let _ = outline.set_attribute("height", &op.outline.height.to_string());
			let _ = outline.set_attribute("class", &op.classes.join(" "));
			let _ = node.group.append_child(&outline);
			if let Some(slot) = outlines.get_mut(op.index) {
				*slot = Some(outline);
			}
		}
	}

	for op in &plan.edge_ops {
		if let Some(path) = scanned.edges.get(op.index) {
			let _ = path.set_attribute("class", &op.classes.join(" "));
		}
	}

	for op in &plan.icon_ops {
		let Some(node) = scanned.nodes.get(op.node_index) else {
			continue;
		};
		if let Some(connector) = &op.connector {
			if let Some(path) = make_svg_element(document, "path") {
				let _ = path.set_attribute("d", connector);
				let _ = path.set_attribute("class", "build-graph-step-connector");
				let _ = node.group.append_child(&path);
			}
		}
		if let Some(path) = make_svg_element(document, "path") {
			let _ = path.set_attribute("d", &op.path);
			let _ = path.set_attribute(
				"class",
				&format!("build-graph-step-icon {}", op.status.class_name()),
			);
			let _ = node.group.append_child(&path);
		}
	}

	wire_hover(scanned, plan, &outlines, &mut handles);
	wire_bindings(scanned, plan, sink, &mut handles);
	wire_gestures(scanned, shared, &mut handles);

	handles
}

/// Push the current transform and the padded viewBox onto the new draw's
/// elements.
pub fn apply_viewport(scanned: &ScannedElements, shared: &ViewportShared) {
	*shared.root_group.borrow_mut() = Some(scanned.root_group.clone());
	let _ = scanned
		.svg
		.set_attribute("viewBox", &padded_view_box(shared.content.get()));
	shared.apply_transform();
}

/// Hover cross-highlighting: entering a node adds the hover class to its
/// outline and every incident edge; leaving removes it again. Purely
/// visual, emits no interaction events.
fn wire_hover(
	scanned: &ScannedElements,
	plan: &DecorationPlan,
	outlines: &[Option<Element>],
	handles: &mut DrawHandles,
) {
	for op in &plan.node_ops {
		let Some(node) = scanned.nodes.get(op.index) else {
			continue;
		};
		let Some(outline) = outlines.get(op.index).cloned().flatten() else {
			continue;
		};
		let edges: Vec<Element> = incident_edges(&plan.edge_ops, &op.descriptor.id)
			.into_iter()
			.filter_map(|i| scanned.edges.get(i).cloned())
			.collect();

		let (enter_outline, enter_edges) = (outline.clone(), edges.clone());
		let enter = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
			let _ = enter_outline.class_list().add_1(CLASS_HOVER);
			for edge in &enter_edges {
				let _ = edge.class_list().add_1(CLASS_HOVER);
			}
		});
		let _ = node
			.group
			.add_event_listener_with_callback("mouseenter", enter.as_ref().unchecked_ref());
		handles.events.push(enter);

		let leave = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
			let _ = outline.class_list().remove_1(CLASS_HOVER);
			for edge in &edges {
				let _ = edge.class_list().remove_1(CLASS_HOVER);
			}
		});
		let _ = node
			.group
			.add_event_listener_with_callback("mouseleave", leave.as_ref().unchecked_ref());
		handles.events.push(leave);
	}
}

/// Click interception. Every handler prevents the default navigation and
/// stops immediate propagation, so a nested step link never also fires its
/// containing node's handler, then defers dispatch through the sink.
fn wire_bindings(
	scanned: &ScannedElements,
	plan: &DecorationPlan,
	sink: &InteractionSink,
	handles: &mut DrawHandles,
) {
	for binding in &plan.bindings {
		match binding {
			Binding::NodeLink {
				node_index,
				node_id,
			} => {
				let Some(link) = scanned
					.nodes
					.get(*node_index)
					.and_then(|n| n.link.clone())
				else {
					continue;
				};
				strip_href(&link);
				let event = InteractionEvent::NodeClick {
					node_id: node_id.clone(),
				};
				attach_click(&link, sink, event, handles);
			}
			Binding::StepLink {
				node_index,
				step_index,
				href,
			} => {
				let Some(anchor) = scanned
					.nodes
					.get(*node_index)
					.and_then(|n| n.steps.get(*step_index).cloned())
				else {
					continue;
				};
				strip_href(&anchor);
				let event = InteractionEvent::Href {
					href: href.clone(),
					step_id: String::new(),
				};
				attach_click(&anchor, sink, event, handles);
			}
			Binding::Backdrop => {
				attach_backdrop_click(&scanned.svg, sink, handles);
			}
		}
	}
}

fn attach_click(
	target: &Element,
	sink: &InteractionSink,
	event: InteractionEvent,
	handles: &mut DrawHandles,
) {
	let sink = sink.clone();
	let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		ev.prevent_default();
		ev.stop_immediate_propagation();
		sink.emit(event.clone());
	});
	let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
	handles.events.push(closure);
}

/// The backdrop listener sits on the `<svg>`, so clicks on link-less node
/// groups and on edge paths bubble up to it. Those are not backdrop
/// clicks; only a target outside every node and edge group emits.
fn attach_backdrop_click(svg: &Element, sink: &InteractionSink, handles: &mut DrawHandles) {
	let sink = sink.clone();
	let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		let on_diagram = ev
			.target()
			.and_then(|t| t.dyn_into::<Element>().ok())
			.and_then(|el| el.closest("g.node, g.edge").ok().flatten())
			.is_some();
		if on_diagram {
			return;
		}
		ev.prevent_default();
		sink.emit(InteractionEvent::BackdropClick);
	});
	let _ = svg.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
	handles.events.push(closure);
}

/// Backdrop pan and cursor-anchored wheel zoom on the host SVG.
fn wire_gestures(scanned: &ScannedElements, shared: &Rc<ViewportShared>, handles: &mut DrawHandles) {
	let svg = scanned.svg.clone();

	let shared_down = shared.clone();
	let on_mousedown = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
		let transform = shared_down.transform();
		*shared_down.pan.borrow_mut() = PanState {
			active: true,
			start: (ev.client_x() as f64, ev.client_y() as f64),
			origin: (transform.x, transform.y),
		};
	});
	let _ = svg.add_event_listener_with_callback("mousedown", on_mousedown.as_ref().unchecked_ref());
	handles.mouse.push(on_mousedown);

	let shared_move = shared.clone();
	let svg_move = svg.clone();
	let on_mousemove = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
		let pan = *shared_move.pan.borrow();
		if !pan.active {
			return;
		}
		// The transform lives in viewBox user units, so the drag delta
		// has to cross from client pixels first.
		let rect = svg_move.get_bounding_client_rect();
		let size = (rect.width(), rect.height());
		let content = shared_move.content.get();
		let start = client_to_user((pan.start.0 - rect.left(), pan.start.1 - rect.top()), size, content);
		let current = client_to_user(
			(ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()),
			size,
			content,
		);
		let mut transform = shared_move.transform();
		transform.x = pan.origin.0 + (current.0 - start.0);
		transform.y = pan.origin.1 + (current.1 - start.1);
		shared_move.set_transform(transform);
	});
	let _ = svg.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
	handles.mouse.push(on_mousemove);

	for kind in ["mouseup", "mouseleave"] {
		let shared_up = shared.clone();
		let on_release = Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
			shared_up.pan.borrow_mut().active = false;
		});
		let _ = svg.add_event_listener_with_callback(kind, on_release.as_ref().unchecked_ref());
		handles.mouse.push(on_release);
	}

	let shared_wheel = shared.clone();
	let svg_wheel = svg.clone();
	let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |ev: WheelEvent| {
		ev.prevent_default();
		let rect = svg_wheel.get_bounding_client_rect();
		let cursor = client_to_user(
			(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			),
			(rect.width(), rect.height()),
			shared_wheel.content.get(),
		);
		let zoomed = wheel_zoom(shared_wheel.transform(), cursor, ev.delta_y());
		shared_wheel.set_transform(zoomed);
	});
	let _ = svg.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref());
	handles.wheel.push(on_wheel);
}

fn make_svg_element(document: &Document, name: &str) -> Option<Element> {
	document.create_element_ns(Some(SVG_NS), name).ok()
}

fn select_all(root: &Element, selector: &str) -> Vec<Element> {
	let mut out = Vec::new();
	if let Ok(list) = root.query_selector_all(selector) {
		for i in 0..list.length() {
			if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
				out.push(el);
			}
		}
	}
	out
}

fn title_text(group: &Element) -> String {
	group
		.query_selector("title")
		.ok()
		.flatten()
		.and_then(|t| t.text_content())
		.unwrap_or_default()
}

fn link_title(anchor: &Element) -> String {
	anchor
		.get_attribute("xlink:title")
		.or_else(|| anchor.get_attribute("title"))
		.unwrap_or_default()
}

fn link_href(anchor: &Element) -> Option<String> {
	anchor
		.get_attribute("xlink:href")
		.or_else(|| anchor.get_attribute("href"))
}

/// Remove the native destination so the browser never navigates; the click
/// handler emits an interaction event instead.
fn strip_href(anchor: &Element) {
	let _ = anchor.remove_attribute("xlink:href");
	let _ = anchor.remove_attribute("href");
}

fn bounding_box(el: &Element) -> ContentBox {
	el.dyn_ref::<web_sys::SvgGraphicsElement>()
		.and_then(|g| g.get_b_box().ok())
		.map(|rect| ContentBox {
			x: rect.x() as f64,
			y: rect.y() as f64,
			width: rect.width() as f64,
			height: rect.height() as f64,
		})
		.unwrap_or_default()
}

fn in_service_cluster(group: &Element) -> bool {
	group
		.closest("g.cluster")
		.ok()
		.flatten()
		.map(|cluster| title_text(&cluster).contains("service"))
		.unwrap_or(false)
}
