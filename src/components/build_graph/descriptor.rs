//! Typed parsing of the comma-encoded identifiers the layout engine
//! carries through into its generated markup.
//!
//! The graph source encodes structured data in element identifiers and
//! titles: node ids as `id,name,status,focused`, edge ids as
//! `source,destination,status,focused`, step titles as `id,name,status`.
//! Parsing is deliberately permissive — a malformed identifier degrades to
//! a documented default descriptor and must never abort the draw.

use super::types::NodeStatus;

/// Raw identifier that did not match the expected field layout.
///
/// Callers substitute the documented default descriptor; the raw string is
/// kept so tests (and debugging) can see what failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Malformed(pub String);

/// Parsed node identity, rebuilt from markup on every draw.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescriptor {
	pub id: String,
	pub name: String,
	pub status: NodeStatus,
	pub focused: bool,
}

impl NodeDescriptor {
	/// Default used when an identifier is malformed.
	pub fn fallback() -> Self {
		Self {
			id: "-2".to_string(),
			name: String::new(),
			status: NodeStatus::Pending,
			focused: false,
		}
	}
}

/// Parsed edge identity plus endpoints, rebuilt on every draw.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDescriptor {
	pub source: String,
	pub destination: String,
	pub status: NodeStatus,
	pub focused: bool,
}

impl EdgeDescriptor {
	/// Default used when an identifier is malformed.
	pub fn fallback() -> Self {
		Self {
			source: "-1".to_string(),
			destination: "-1".to_string(),
			status: NodeStatus::Pending,
			focused: false,
		}
	}
}

/// Parsed step identity from a step cell's title attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct StepDescriptor {
	pub id: String,
	pub name: String,
	pub status: NodeStatus,
}

/// Parse a node identifier: `id,name,status,focused`.
///
/// Node names may themselves contain commas, so the middle fields re-join
/// as the name; status and focused are always the last two fields.
pub fn parse_node_id(raw: &str) -> Result<NodeDescriptor, Malformed> {
	let fields: Vec<&str> = raw.split(',').collect();
	if fields.len() < 4 {
		return Err(Malformed(raw.to_string()));
	}
	let last = fields.len() - 1;
	Ok(NodeDescriptor {
		id: fields[0].to_string(),
		name: fields[1..last - 1].join(","),
		status: NodeStatus::parse(fields[last - 1]),
		focused: fields[last].trim() == "true",
	})
}

/// Parse a node identifier, substituting [`NodeDescriptor::fallback`] on
/// malformed input.
pub fn parse_node_id_or_default(raw: &str) -> NodeDescriptor {
	parse_node_id(raw).unwrap_or_else(|_| NodeDescriptor::fallback())
}

/// Parse an edge identifier: `source,destination,status,focused`.
/// Extra trailing fields are ignored.
pub fn parse_edge_id(raw: &str) -> Result<EdgeDescriptor, Malformed> {
	let fields: Vec<&str> = raw.split(',').collect();
	if fields.len() < 4 {
		return Err(Malformed(raw.to_string()));
	}
	Ok(EdgeDescriptor {
		source: fields[0].to_string(),
		destination: fields[1].to_string(),
		status: NodeStatus::parse(fields[2]),
		focused: fields[3].trim() == "true",
	})
}

/// Parse an edge identifier, substituting [`EdgeDescriptor::fallback`] on
/// malformed input.
pub fn parse_edge_id_or_default(raw: &str) -> EdgeDescriptor {
	parse_edge_id(raw).unwrap_or_else(|_| EdgeDescriptor::fallback())
}

/// Parse a step title: `id,name,status`. Status is optional and defaults
/// to pending.
pub fn parse_step_title(raw: &str) -> Result<StepDescriptor, Malformed> {
	let fields: Vec<&str> = raw.split(',').collect();
	if fields.len() < 2 {
		return Err(Malformed(raw.to_string()));
	}
	Ok(StepDescriptor {
		id: fields[0].to_string(),
		name: fields[1].to_string(),
		status: fields
			.get(2)
			.map(|s| NodeStatus::parse(s))
			.unwrap_or_default(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_id_parses_four_fields() {
		let node = parse_node_id("3,init,success,false").unwrap();
		assert_eq!(node.id, "3");
		assert_eq!(node.name, "init");
		assert_eq!(node.status, NodeStatus::Success);
		assert!(!node.focused);
	}

	#[test]
	fn node_name_may_contain_commas() {
		let node = parse_node_id("7,deploy, staging,running,true").unwrap();
		assert_eq!(node.id, "7");
		assert_eq!(node.name, "deploy, staging");
		assert_eq!(node.status, NodeStatus::Running);
		assert!(node.focused);
	}

	#[test]
	fn short_node_id_is_malformed_and_defaults() {
		assert_eq!(
			parse_node_id("3,init"),
			Err(Malformed("3,init".to_string()))
		);
		let node = parse_node_id_or_default("3,init");
		assert_eq!(node.id, "-2");
		assert_eq!(node.status, NodeStatus::Pending);
		assert!(!node.focused);
	}

	#[test]
	fn edge_id_parses_endpoints() {
		let edge = parse_edge_id("3,4,success,false").unwrap();
		assert_eq!(edge.source, "3");
		assert_eq!(edge.destination, "4");
		assert_eq!(edge.status, NodeStatus::Success);
		assert!(!edge.focused);
	}

	#[test]
	fn short_edge_id_is_malformed_and_defaults() {
		assert!(parse_edge_id("3,4,success").is_err());
		let edge = parse_edge_id_or_default("3,4");
		assert_eq!(edge.source, "-1");
		assert_eq!(edge.destination, "-1");
		assert_eq!(edge.status, NodeStatus::Pending);
		assert!(!edge.focused);
	}

	#[test]
	fn step_title_status_defaults_to_pending() {
		let step = parse_step_title("12,clone").unwrap();
		assert_eq!(step.id, "12");
		assert_eq!(step.name, "clone");
		assert_eq!(step.status, NodeStatus::Pending);

		let step = parse_step_title("12,clone,failure").unwrap();
		assert_eq!(step.status, NodeStatus::Failure);
	}

	#[test]
	fn single_field_step_title_is_malformed() {
		assert!(parse_step_title("12").is_err());
		assert!(parse_step_title("").is_err());
	}
}
