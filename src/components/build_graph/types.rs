//! Core data types for the build graph renderer.
//!
//! These mirror the port contract with the owning dashboard application:
//! render requests come in, interaction events go out. Everything else in
//! this module is derived per draw and never persisted.

use serde::{Deserialize, Serialize};

/// One render command from the owning application.
///
/// Issued whenever the build graph data changes or a view toggle flips.
/// Consumed once by the draw pipeline; never mutated after arrival.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRenderRequest {
	/// DOT source for the layout engine.
	pub graph_text: String,
	/// Build this graph belongs to.
	pub build_id: i64,
	/// Free-text filter currently applied in the UI.
	#[serde(default)]
	pub filter_text: String,
	/// Node the user has selected, -1 when none.
	#[serde(default = "default_focused_node")]
	pub focused_node_id: i64,
	/// Whether service nodes should show their step detail.
	#[serde(default)]
	pub show_services: bool,
	/// Whether stage nodes should show their step detail.
	#[serde(default)]
	pub show_steps: bool,
	/// True when the graph data is genuinely new (as opposed to a poll
	/// refresh of the same build).
	#[serde(default)]
	pub fresh_draw: bool,
}

fn default_focused_node() -> i64 {
	-1
}

/// Interaction event sent back through the port bridge.
///
/// Exactly one event is emitted per qualifying gesture; nested clickable
/// elements stop propagation so a step click never doubles as a node click.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum InteractionEvent {
	/// Click on the diagram backdrop, outside any node or edge.
	BackdropClick,
	/// Click on a node's link wrapper.
	NodeClick {
		/// First field of the node's comma-encoded identifier.
		node_id: String,
	},
	/// Click on a step cell link. The href has already been stripped from
	/// the DOM; the owning application decides how to navigate.
	Href {
		/// Original destination of the stripped link.
		href: String,
		/// Reserved, currently always empty.
		step_id: String,
	},
}

/// Status of a node, edge, or step as encoded by the graph source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeStatus {
	#[default]
	Pending,
	Running,
	Success,
	Failure,
	Killed,
	Canceled,
	Skipped,
	Error,
}

impl NodeStatus {
	/// Parse a status token. Unknown tokens degrade to `Pending` rather
	/// than failing the draw.
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"running" => Self::Running,
			"success" => Self::Success,
			"failure" => Self::Failure,
			"killed" => Self::Killed,
			"canceled" => Self::Canceled,
			"skipped" => Self::Skipped,
			"error" => Self::Error,
			_ => Self::Pending,
		}
	}

	/// CSS modifier class applied to decorated elements (`-success` etc).
	pub fn class_name(self) -> &'static str {
		match self {
			Self::Pending => "-pending",
			Self::Running => "-running",
			Self::Success => "-success",
			Self::Failure => "-failure",
			Self::Killed => "-killed",
			Self::Canceled => "-canceled",
			Self::Skipped => "-skipped",
			Self::Error => "-error",
		}
	}
}

/// State modifier class for focused elements.
pub const CLASS_FOCUS: &str = "-focus";
/// State modifier class for hovered elements.
pub const CLASS_HOVER: &str = "-hover";
