//! Pan/zoom transform math and viewBox fitting for the decorated diagram.
//!
//! The transform is applied to the diagram's root group; the viewBox is
//! applied to the host SVG element. A zero-area bounding box (empty graph)
//! would otherwise produce NaN transform components, so every transform is
//! sanitized before it reaches the DOM.

/// Lower bound on the zoom scale. There is no upper bound.
pub const MIN_SCALE: f64 = 0.1;

/// Extra viewBox width on the right so the legend overlay is not cropped.
const PAD_RIGHT: f64 = 300.0;
/// Extra viewBox height below the content.
const PAD_BOTTOM: f64 = 100.0;

/// Zoom/pan transform applied to the diagram root group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Zoom factor, clamped to `[MIN_SCALE, ∞)`.
	pub k: f64,
	pub x: f64,
	pub y: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			k: 1.0,
			x: 0.0,
			y: 0.0,
		}
	}
}

impl ViewTransform {
	/// Coerce degenerate components before the transform touches the DOM:
	/// NaN scale becomes 1, NaN translation becomes 0, and the scale is
	/// clamped to the minimum.
	pub fn sanitized(self) -> Self {
		let k = if self.k.is_nan() { 1.0 } else { self.k };
		Self {
			k: k.max(MIN_SCALE),
			x: if self.x.is_nan() { 0.0 } else { self.x },
			y: if self.y.is_nan() { 0.0 } else { self.y },
		}
	}

	/// SVG `transform` attribute value for the root group.
	pub fn to_svg(self) -> String {
		format!("translate({} {}) scale({})", self.x, self.y, self.k)
	}
}

/// Content bounding box of the generated diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentBox {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl ContentBox {
	pub fn midpoint(self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// Recenter transform: scale back to 1 and translate the view to the
/// content midpoint. Always sanitized.
pub fn recenter_transform(content: ContentBox) -> ViewTransform {
	let (mx, my) = content.midpoint();
	ViewTransform { k: 1.0, x: mx, y: my }.sanitized()
}

/// viewBox value padding the content asymmetrically: no left/top padding,
/// extra room on the right for the legend overlay and extra room below.
pub fn padded_view_box(content: ContentBox) -> String {
	let content = sanitize_box(content);
	format!(
		"{} {} {} {}",
		content.x,
		content.y,
		content.width + PAD_RIGHT,
		content.height + PAD_BOTTOM
	)
}

fn sanitize_box(content: ContentBox) -> ContentBox {
	let clean = |v: f64| if v.is_nan() { 0.0 } else { v };
	ContentBox {
		x: clean(content.x),
		y: clean(content.y),
		width: clean(content.width),
		height: clean(content.height),
	}
}

/// Map a cursor position, in client pixels relative to the SVG's bounding
/// rect, into viewBox user units.
///
/// The browser fits the padded viewBox into the rect uniformly, centered
/// (the default `xMidYMid meet`), so the transform math cannot consume raw
/// pixel offsets once the two coordinate spaces diverge.
pub fn client_to_user(cursor: (f64, f64), rect: (f64, f64), content: ContentBox) -> (f64, f64) {
	let content = sanitize_box(content);
	let view_width = content.width + PAD_RIGHT;
	let view_height = content.height + PAD_BOTTOM;
	let (rect_width, rect_height) = rect;
	if rect_width <= 0.0 || rect_height <= 0.0 {
		return cursor;
	}
	let scale = (rect_width / view_width).min(rect_height / view_height);
	let offset_x = (rect_width - scale * view_width) / 2.0;
	let offset_y = (rect_height - scale * view_height) / 2.0;
	(
		content.x + (cursor.0 - offset_x) / scale,
		content.y + (cursor.1 - offset_y) / scale,
	)
}

/// Cursor-anchored wheel zoom: the point under the cursor stays put while
/// the scale changes by a fixed factor per wheel notch.
pub fn wheel_zoom(transform: ViewTransform, cursor: (f64, f64), delta_y: f64) -> ViewTransform {
	let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
	let new_k = (transform.k * factor).max(MIN_SCALE);
	let ratio = new_k / transform.k;
	ViewTransform {
		k: new_k,
		x: cursor.0 - (cursor.0 - transform.x) * ratio,
		y: cursor.1 - (cursor.1 - transform.y) * ratio,
	}
	.sanitized()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nan_components_are_coerced() {
		let t = ViewTransform {
			k: f64::NAN,
			x: f64::NAN,
			y: f64::NAN,
		}
		.sanitized();
		assert_eq!(t, ViewTransform { k: 1.0, x: 0.0, y: 0.0 });
	}

	#[test]
	fn scale_is_clamped_below() {
		let t = ViewTransform {
			k: 0.01,
			x: 5.0,
			y: 5.0,
		}
		.sanitized();
		assert_eq!(t.k, MIN_SCALE);
		assert_eq!(t.x, 5.0);
	}

	#[test]
	fn recenter_resets_scale_and_targets_midpoint() {
		let t = recenter_transform(ContentBox {
			x: 10.0,
			y: 20.0,
			width: 100.0,
			height: 60.0,
		});
		assert_eq!(t.k, 1.0);
		assert_eq!(t.x, 60.0);
		assert_eq!(t.y, 50.0);
	}

	#[test]
	fn zero_area_box_never_produces_nan() {
		let t = recenter_transform(ContentBox::default());
		assert!(!t.k.is_nan() && !t.x.is_nan() && !t.y.is_nan());
		assert_eq!(t.k, 1.0);

		let degenerate = ContentBox {
			x: f64::NAN,
			y: f64::NAN,
			width: f64::NAN,
			height: f64::NAN,
		};
		let t = recenter_transform(degenerate);
		assert_eq!(t, ViewTransform { k: 1.0, x: 0.0, y: 0.0 });
		assert_eq!(padded_view_box(degenerate), "0 0 300 100");
	}

	#[test]
	fn view_box_pads_right_and_bottom_only() {
		let vb = padded_view_box(ContentBox {
			x: 0.0,
			y: 0.0,
			width: 400.0,
			height: 200.0,
		});
		assert_eq!(vb, "0 0 700 300");
	}

	#[test]
	fn cursor_maps_through_view_box_scale_and_letterbox() {
		let content = ContentBox {
			x: 0.0,
			y: 0.0,
			width: 400.0,
			height: 200.0,
		};
		// viewBox is 700x300; a rect of the same size maps one to one.
		assert_eq!(client_to_user((100.0, 50.0), (700.0, 300.0), content), (100.0, 50.0));
		// Half-size rect doubles every pixel offset.
		assert_eq!(client_to_user((100.0, 50.0), (350.0, 150.0), content), (200.0, 100.0));
		// A wide rect centers the viewBox horizontally.
		assert_eq!(client_to_user((450.0, 50.0), (1400.0, 300.0), content), (100.0, 50.0));
	}

	#[test]
	fn cursor_conversion_honours_content_origin() {
		let content = ContentBox {
			x: 10.0,
			y: 20.0,
			width: 400.0,
			height: 200.0,
		};
		assert_eq!(client_to_user((0.0, 0.0), (700.0, 300.0), content), (10.0, 20.0));
	}

	#[test]
	fn wheel_zoom_keeps_cursor_anchored() {
		let t = ViewTransform::default();
		let zoomed = wheel_zoom(t, (100.0, 50.0), -1.0);
		assert!((zoomed.k - 1.1).abs() < 1e-9);
		// The cursor point maps to itself under the new transform.
		let before = (100.0 - t.x) / t.k;
		let after = (100.0 - zoomed.x) / zoomed.k;
		assert!((before - after).abs() < 1e-9);
	}

	#[test]
	fn wheel_zoom_respects_minimum_scale() {
		let mut t = ViewTransform {
			k: MIN_SCALE,
			x: 0.0,
			y: 0.0,
		};
		t = wheel_zoom(t, (0.0, 0.0), 1.0);
		assert_eq!(t.k, MIN_SCALE);
	}

	#[test]
	fn transform_attribute_format() {
		let t = ViewTransform {
			k: 2.0,
			x: 10.0,
			y: -4.0,
		};
		assert_eq!(t.to_svg(), "translate(10 -4) scale(2)");
	}
}
