//! Adapter for the external layout engine.
//!
//! The engine is a black box provided by the host page: DOT text in,
//! SVG markup out, asynchronously. Nothing else about it is assumed.

use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
	/// Host-page layout function: `renderGraphvizSvg(dot) -> Promise<string>`.
	#[wasm_bindgen(js_name = renderGraphvizSvg, catch)]
	fn render_graphviz_svg(dot: &str) -> Result<Promise, JsValue>;
}

/// Lay out one DOT graph, yielding the generated SVG markup.
pub async fn layout_dot(dot: &str) -> Result<String, JsValue> {
	let value = JsFuture::from(render_graphviz_svg(dot)?).await?;
	value
		.as_string()
		.ok_or_else(|| JsValue::from_str("layout engine returned a non-string result"))
}
