//! Errors raised while attaching the background to the page.

/// Failures that prevent the background from rendering at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackgroundError {
	#[error("no global window")]
	NoWindow,

	#[error("window has no document")]
	NoDocument,

	#[error("canvas with id '{0}' not found")]
	CanvasNotFound(String),

	#[error("element '{0}' is not a canvas")]
	NotACanvas(String),

	#[error("canvas '{0}' has no 2d context")]
	ContextUnavailable(String),

	#[error("javascript error: {0}")]
	Js(String),
}

impl BackgroundError {
	/// Wraps a thrown JS value.
	pub fn js(value: &wasm_bindgen::JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
