//! Decoration planning: turns a scanned markup summary into the set of
//! class, icon, and event-wiring operations for one draw.
//!
//! The planner is a pure function over data extracted from the generated
//! SVG, so the whole decoration policy is unit-testable without a DOM. The
//! thin adapter in `dom.rs` extracts the summary and applies the plan.
//!
//! Planning never fails: malformed identifiers degrade to the documented
//! default descriptors and render with the pending/unknown appearance.

use super::descriptor::{
	EdgeDescriptor, NodeDescriptor, parse_edge_id_or_default, parse_node_id_or_default,
	parse_step_title,
};
use super::icons::{Glyph, connector_path};
use super::types::{CLASS_FOCUS, GraphRenderRequest, NodeStatus};
use super::viewport::ContentBox;

/// Padding added around a node's bounding box for its outline overlay.
const OUTLINE_PAD: f64 = 2.0;
/// Icon centre offset to the left of a step label's box.
const ICON_OFFSET: f64 = 10.0;
/// Step icon radius.
const ICON_RADIUS: f64 = 6.0;

/// One node as extracted from the generated markup.
#[derive(Clone, Debug, Default)]
pub struct MarkupNode {
	/// Comma-encoded identifier from the node's title.
	pub raw_id: String,
	/// Bounding box of the node group.
	pub bbox: ContentBox,
	/// Whether the node sits inside the services cluster.
	pub in_service_cluster: bool,
	/// Whether the node carries a link wrapper.
	pub has_link: bool,
	/// Step cells found inside the node, in document order.
	pub steps: Vec<MarkupStep>,
}

/// One step cell inside a node.
#[derive(Clone, Debug, Default)]
pub struct MarkupStep {
	/// Comma-encoded title attribute.
	pub raw_title: String,
	/// Original link destination, if the cell is a link.
	pub href: Option<String>,
	/// Bounding box of the step's text label.
	pub label_box: ContentBox,
}

/// One edge as extracted from the generated markup.
#[derive(Clone, Debug, Default)]
pub struct MarkupEdge {
	/// Comma-encoded identifier from the edge's title.
	pub raw_id: String,
}

/// Everything the planner needs from one layout engine output.
///
/// Rebuilt by the scanner on every draw; nothing here outlives the pass.
#[derive(Clone, Debug, Default)]
pub struct MarkupSummary {
	pub nodes: Vec<MarkupNode>,
	pub edges: Vec<MarkupEdge>,
}

/// Decoration for one node: an outline overlay carrying the status and
/// focus classes, sized to the node's bounding box.
#[derive(Clone, Debug)]
pub struct NodeOp {
	/// Index into [`MarkupSummary::nodes`].
	pub index: usize,
	pub descriptor: NodeDescriptor,
	/// Outline overlay geometry.
	pub outline: ContentBox,
	/// Classes for the outline element.
	pub classes: Vec<String>,
}

/// Decoration for one edge's path element.
#[derive(Clone, Debug)]
pub struct EdgeOp {
	/// Index into [`MarkupSummary::edges`].
	pub index: usize,
	pub descriptor: EdgeDescriptor,
	/// Classes for the path element.
	pub classes: Vec<String>,
}

/// One status glyph (plus optional connector to the previous step's glyph)
/// to insert into a node.
#[derive(Clone, Debug)]
pub struct IconOp {
	/// Index into [`MarkupSummary::nodes`].
	pub node_index: usize,
	/// Index into that node's steps.
	pub step_index: usize,
	pub status: NodeStatus,
	/// Glyph path data, ready for a `<path d=…>`.
	pub path: String,
	/// Connector path data chaining from the previous step's icon.
	pub connector: Option<String>,
}

/// Declarative event binding applied by the DOM adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
	/// Node link wrapper click; emits `NodeClick {node_id}`.
	NodeLink { node_index: usize, node_id: String },
	/// Step cell link click; the href is stripped from the DOM and carried
	/// here instead.
	StepLink {
		node_index: usize,
		step_index: usize,
		href: String,
	},
	/// Click on the diagram backdrop.
	Backdrop,
}

/// Full decoration plan for one draw.
#[derive(Clone, Debug, Default)]
pub struct DecorationPlan {
	pub node_ops: Vec<NodeOp>,
	pub edge_ops: Vec<EdgeOp>,
	pub icon_ops: Vec<IconOp>,
	pub bindings: Vec<Binding>,
}

/// Compute the decoration plan for one scanned markup summary.
pub fn plan(summary: &MarkupSummary, request: &GraphRenderRequest) -> DecorationPlan {
	let mut out = DecorationPlan::default();
	let filter = request.filter_text.trim();

	for (index, node) in summary.nodes.iter().enumerate() {
		let descriptor = parse_node_id_or_default(&node.raw_id);
		let focused = descriptor.focused
			|| (!filter.is_empty() && descriptor.name.contains(filter));

		let mut classes = vec![
			"build-graph-node-outline".to_string(),
			descriptor.status.class_name().to_string(),
		];
		if focused {
			classes.push(CLASS_FOCUS.to_string());
		}

		out.node_ops.push(NodeOp {
			index,
			descriptor: descriptor.clone(),
			outline: ContentBox {
				x: node.bbox.x - OUTLINE_PAD,
				y: node.bbox.y - OUTLINE_PAD,
				width: node.bbox.width + OUTLINE_PAD * 2.0,
				height: node.bbox.height + OUTLINE_PAD * 2.0,
			},
			classes,
		});

		if node.has_link {
			out.bindings.push(Binding::NodeLink {
				node_index: index,
				// Click identity falls back to -1, unlike the -2 used for
				// the visual descriptor default.
				node_id: super::descriptor::parse_node_id(&node.raw_id)
					.map(|d| d.id)
					.unwrap_or_else(|_| "-1".to_string()),
			});
		}

		// Link interception is unconditional; only the icon detail is
		// gated by the view toggles.
		let show_icons = if node.in_service_cluster {
			request.show_services
		} else {
			request.show_steps
		};

		let mut previous_center: Option<(f64, f64)> = None;
		for (step_index, step) in node.steps.iter().enumerate() {
			if let Some(href) = &step.href {
				out.bindings.push(Binding::StepLink {
					node_index: index,
					step_index,
					href: href.clone(),
				});
			}

			if !show_icons {
				continue;
			}

			let status = parse_step_title(&step.raw_title)
				.map(|s| s.status)
				.unwrap_or_default();
			let cx = step.label_box.x - ICON_OFFSET;
			let cy = step.label_box.y + step.label_box.height / 2.0;

			out.icon_ops.push(IconOp {
				node_index: index,
				step_index,
				status,
				path: Glyph::for_status(status).path_data(cx, cy, ICON_RADIUS),
				connector: previous_center.map(|(px, py)| {
					connector_path((px, py + ICON_RADIUS), (cx, cy - ICON_RADIUS))
				}),
			});
			previous_center = Some((cx, cy));
		}
	}

	for (index, edge) in summary.edges.iter().enumerate() {
		let descriptor = parse_edge_id_or_default(&edge.raw_id);
		let mut classes = vec![
			"build-graph-edge".to_string(),
			descriptor.status.class_name().to_string(),
		];
		if descriptor.focused {
			classes.push(CLASS_FOCUS.to_string());
		}
		out.edge_ops.push(EdgeOp {
			index,
			descriptor,
			classes,
		});
	}

	out.bindings.push(Binding::Backdrop);
	out
}

/// Indices of the edges incident to `node_id` (as source or destination).
///
/// Hover cross-highlighting recomputes this from the current draw's edge
/// list every time; nothing is incrementally patched.
pub fn incident_edges(edge_ops: &[EdgeOp], node_id: &str) -> Vec<usize> {
	edge_ops
		.iter()
		.enumerate()
		.filter(|(_, op)| {
			op.descriptor.source == node_id || op.descriptor.destination == node_id
		})
		.map(|(i, _)| i)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use super::super::types::CLASS_HOVER;

	fn request() -> GraphRenderRequest {
		GraphRenderRequest {
			graph_text: "digraph {}".to_string(),
			build_id: 4,
			filter_text: String::new(),
			focused_node_id: -1,
			show_services: true,
			show_steps: true,
			fresh_draw: true,
		}
	}

	fn node(raw_id: &str) -> MarkupNode {
		MarkupNode {
			raw_id: raw_id.to_string(),
			bbox: ContentBox {
				x: 10.0,
				y: 10.0,
				width: 80.0,
				height: 40.0,
			},
			in_service_cluster: false,
			has_link: true,
			steps: Vec::new(),
		}
	}

	fn dag_summary() -> MarkupSummary {
		// Six-node DAG: 0 -> 1 -> {2, 3}, 3 -> 4 -> 5, node 3 succeeded.
		MarkupSummary {
			nodes: vec![
				node("0,clone,success,false"),
				node("1,test,running,false"),
				node("2,lint,pending,false"),
				node("3,build,success,false"),
				node("4,publish,pending,false"),
				node("5,notify,pending,false"),
			],
			edges: vec![
				MarkupEdge { raw_id: "0,1,success,false".to_string() },
				MarkupEdge { raw_id: "1,2,running,false".to_string() },
				MarkupEdge { raw_id: "1,3,running,false".to_string() },
				MarkupEdge { raw_id: "3,4,success,false".to_string() },
				MarkupEdge { raw_id: "4,5,pending,false".to_string() },
			],
		}
	}

	#[test]
	fn successful_node_gets_success_class() {
		let plan = plan(&dag_summary(), &request());
		let op = &plan.node_ops[3];
		assert_eq!(op.descriptor.id, "3");
		assert!(op.classes.iter().any(|c| c == "-success"));
	}

	#[test]
	fn node_link_binding_carries_parsed_id() {
		let plan = plan(&dag_summary(), &request());
		assert!(plan.bindings.contains(&Binding::NodeLink {
			node_index: 3,
			node_id: "3".to_string(),
		}));
	}

	#[test]
	fn malformed_node_degrades_without_failing() {
		let summary = MarkupSummary {
			nodes: vec![node("garbage")],
			edges: vec![MarkupEdge { raw_id: "nope".to_string() }],
		};
		let plan = plan(&summary, &request());
		assert_eq!(plan.node_ops[0].descriptor.id, "-2");
		assert!(plan.node_ops[0].classes.iter().any(|c| c == "-pending"));
		assert_eq!(plan.edge_ops[0].descriptor.source, "-1");
		// The click identity default differs from the visual default.
		assert!(plan.bindings.contains(&Binding::NodeLink {
			node_index: 0,
			node_id: "-1".to_string(),
		}));
	}

	#[test]
	fn outline_wraps_the_node_box() {
		let plan = plan(&dag_summary(), &request());
		let outline = plan.node_ops[0].outline;
		assert_eq!(outline.x, 8.0);
		assert_eq!(outline.width, 84.0);
	}

	#[test]
	fn incident_edges_match_source_or_destination() {
		let plan = plan(&dag_summary(), &request());
		assert_eq!(incident_edges(&plan.edge_ops, "1"), vec![0, 1, 2]);
		assert_eq!(incident_edges(&plan.edge_ops, "3"), vec![2, 3]);
		assert!(incident_edges(&plan.edge_ops, "99").is_empty());
	}

	#[test]
	fn hover_unhover_restores_status_classes() {
		// Simulate what the DOM adapter does: add the hover class to the
		// incident edges, then remove it again.
		let plan = plan(&dag_summary(), &request());
		let mut classes: Vec<Vec<String>> =
			plan.edge_ops.iter().map(|op| op.classes.clone()).collect();
		let original = classes.clone();

		for &i in &incident_edges(&plan.edge_ops, "3") {
			classes[i].push(CLASS_HOVER.to_string());
		}
		for list in &mut classes {
			list.retain(|c| c != CLASS_HOVER);
		}
		assert_eq!(classes, original);
	}

	#[test]
	fn filter_text_focuses_matching_nodes() {
		let mut req = request();
		req.filter_text = "build".to_string();
		let plan = plan(&dag_summary(), &req);
		assert!(plan.node_ops[3].classes.iter().any(|c| c == CLASS_FOCUS));
		assert!(!plan.node_ops[0].classes.iter().any(|c| c == CLASS_FOCUS));
	}

	#[test]
	fn focused_flag_in_identifier_focuses_node() {
		let summary = MarkupSummary {
			nodes: vec![node("2,lint,pending,true")],
			edges: Vec::new(),
		};
		let plan = plan(&summary, &request());
		assert!(plan.node_ops[0].classes.iter().any(|c| c == CLASS_FOCUS));
	}

	#[test]
	fn step_icons_chain_with_connectors() {
		let mut stage = node("1,test,running,false");
		stage.steps = vec![
			MarkupStep {
				raw_title: "10,clone,success".to_string(),
				href: Some("/build/4#step:10".to_string()),
				label_box: ContentBox {
					x: 30.0,
					y: 12.0,
					width: 40.0,
					height: 10.0,
				},
			},
			MarkupStep {
				raw_title: "11,test,running".to_string(),
				href: Some("/build/4#step:11".to_string()),
				label_box: ContentBox {
					x: 30.0,
					y: 30.0,
					width: 40.0,
					height: 10.0,
				},
			},
		];
		let summary = MarkupSummary {
			nodes: vec![stage],
			edges: Vec::new(),
		};
		let plan = plan(&summary, &request());
		assert_eq!(plan.icon_ops.len(), 2);
		assert!(plan.icon_ops[0].connector.is_none());
		assert!(plan.icon_ops[1].connector.is_some());
		assert_eq!(plan.icon_ops[0].status, NodeStatus::Success);
		assert_eq!(plan.icon_ops[1].status, NodeStatus::Running);
	}

	#[test]
	fn show_steps_off_suppresses_icons_but_not_links() {
		let mut stage = node("1,test,running,false");
		stage.steps = vec![MarkupStep {
			raw_title: "10,clone,success".to_string(),
			href: Some("/build/4#step:10".to_string()),
			label_box: ContentBox::default(),
		}];
		let summary = MarkupSummary {
			nodes: vec![stage],
			edges: Vec::new(),
		};
		let mut req = request();
		req.show_steps = false;
		let plan = plan(&summary, &req);
		assert!(plan.icon_ops.is_empty());
		assert!(plan
			.bindings
			.iter()
			.any(|b| matches!(b, Binding::StepLink { .. })));
	}

	#[test]
	fn service_icons_follow_show_services() {
		let mut service = node("s1,postgres,running,false");
		service.in_service_cluster = true;
		service.steps = vec![MarkupStep {
			raw_title: "20,postgres,running".to_string(),
			href: None,
			label_box: ContentBox::default(),
		}];
		let summary = MarkupSummary {
			nodes: vec![service],
			edges: Vec::new(),
		};

		let mut req = request();
		req.show_services = false;
		assert!(plan(&summary, &req).icon_ops.is_empty());

		req.show_services = true;
		assert_eq!(plan(&summary, &req).icon_ops.len(), 1);
	}

	#[test]
	fn backdrop_binding_is_always_present() {
		let plan = plan(&MarkupSummary::default(), &request());
		assert_eq!(plan.bindings, vec![Binding::Backdrop]);
	}
}
