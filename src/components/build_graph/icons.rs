//! Status glyphs drawn next to step labels inside a node.
//!
//! Each step status maps to a small fixed shape, positioned at a fixed
//! offset from the step's text label. Consecutive step icons within one
//! node are chained with a short connector mark.

use super::types::NodeStatus;

/// Shape of a step status icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
	/// Pending: a single dot.
	Dot,
	/// Running: a clock-like half circle.
	Clock,
	/// Success: a checkmark.
	Check,
	/// Failure, canceled, error: an X mark.
	Cross,
	/// Killed, skipped: two dots.
	TwoDots,
}

impl Glyph {
	/// Fixed status → shape mapping.
	pub fn for_status(status: NodeStatus) -> Self {
		match status {
			NodeStatus::Pending => Self::Dot,
			NodeStatus::Running => Self::Clock,
			NodeStatus::Success => Self::Check,
			NodeStatus::Failure | NodeStatus::Canceled | NodeStatus::Error => Self::Cross,
			NodeStatus::Killed | NodeStatus::Skipped => Self::TwoDots,
		}
	}

	/// SVG path data for this glyph centred at `(cx, cy)` with radius `r`.
	pub fn path_data(self, cx: f64, cy: f64, r: f64) -> String {
		match self {
			Self::Dot => circle_path(cx, cy, r * 0.45),
			Self::Clock => {
				// Upper half circle plus the minute hand.
				format!(
					"M {} {} A {r} {r} 0 0 1 {} {} M {cx} {cy} L {cx} {}",
					cx - r,
					cy,
					cx + r,
					cy,
					cy - r * 0.7,
				)
			}
			Self::Check => format!(
				"M {} {} L {} {} L {} {}",
				cx - r,
				cy,
				cx - r * 0.25,
				cy + r * 0.7,
				cx + r,
				cy - r * 0.6,
			),
			Self::Cross => format!(
				"M {} {} L {} {} M {} {} L {} {}",
				cx - r * 0.7,
				cy - r * 0.7,
				cx + r * 0.7,
				cy + r * 0.7,
				cx + r * 0.7,
				cy - r * 0.7,
				cx - r * 0.7,
				cy + r * 0.7,
			),
			Self::TwoDots => {
				let mut d = circle_path(cx - r * 0.5, cy, r * 0.3);
				d.push(' ');
				d.push_str(&circle_path(cx + r * 0.5, cy, r * 0.3));
				d
			}
		}
	}
}

/// Connector mark chaining a step icon to the previous step's icon.
pub fn connector_path(from: (f64, f64), to: (f64, f64)) -> String {
	format!("M {} {} L {} {}", from.0, from.1, to.0, to.1)
}

/// Circle as path data (two arcs), so all glyphs are plain `<path>`s.
fn circle_path(cx: f64, cy: f64, r: f64) -> String {
	format!(
		"M {} {cy} A {r} {r} 0 1 0 {} {cy} A {r} {r} 0 1 0 {} {cy}",
		cx - r,
		cx + r,
		cx - r,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_to_glyph_mapping() {
		assert_eq!(Glyph::for_status(NodeStatus::Pending), Glyph::Dot);
		assert_eq!(Glyph::for_status(NodeStatus::Running), Glyph::Clock);
		assert_eq!(Glyph::for_status(NodeStatus::Success), Glyph::Check);
		assert_eq!(Glyph::for_status(NodeStatus::Failure), Glyph::Cross);
		assert_eq!(Glyph::for_status(NodeStatus::Canceled), Glyph::Cross);
		assert_eq!(Glyph::for_status(NodeStatus::Error), Glyph::Cross);
		assert_eq!(Glyph::for_status(NodeStatus::Killed), Glyph::TwoDots);
		assert_eq!(Glyph::for_status(NodeStatus::Skipped), Glyph::TwoDots);
	}

	#[test]
	fn glyph_paths_are_well_formed() {
		for glyph in [
			Glyph::Dot,
			Glyph::Clock,
			Glyph::Check,
			Glyph::Cross,
			Glyph::TwoDots,
		] {
			let d = glyph.path_data(10.0, 20.0, 5.0);
			assert!(d.starts_with("M "), "path for {glyph:?} must start with a move");
			assert!(!d.contains("NaN"));
		}
	}

	#[test]
	fn connector_joins_the_two_points() {
		assert_eq!(
			connector_path((1.0, 2.0), (1.0, 10.0)),
			"M 1 2 L 1 10"
		);
	}
}
