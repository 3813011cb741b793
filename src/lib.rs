//! starfield-background: animated canvas backdrop for a profile landing page.
//!
//! This crate provides a WASM-based background renderer that draws a drifting
//! starfield with depth parallax, proximity links, shooting stars and a
//! palette-driven gradient, recolored live when the page's theme changes.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::background::{
	Background, BackgroundCanvas, BackgroundError, Bounds, Lifecycle, Point, Rgb, Settings,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("starfield: logging initialized");
}

/// Text content of a `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load the palette from a script element with id="palette-data".
/// Expected format: JSON array of `[r, g, b]` triples.
fn load_palette() -> Vec<Rgb> {
	let Some(json_text) = script_text("palette-data") else {
		return Vec::new();
	};
	match serde_json::from_str::<Vec<Rgb>>(&json_text) {
		Ok(palette) => {
			info!("starfield: loaded {} palette colors", palette.len());
			palette
		}
		Err(e) => {
			warn!("starfield: failed to parse palette data: {}", e);
			Vec::new()
		}
	}
}

/// Load renderer settings from a script element with id="background-settings".
/// Missing keys keep their defaults.
fn load_settings() -> Settings {
	let Some(json_text) = script_text("background-settings") else {
		return Settings::default();
	};
	Settings::from_json(&json_text).unwrap_or_else(|e| {
		warn!("starfield: failed to parse background settings: {}", e);
		Settings::default()
	})
}

/// Main application component.
/// Reads palette and settings from the DOM and renders the animated background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let palette = load_palette();
	let settings = load_settings();
	let palette_signal = Signal::derive(move || palette.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<BackgroundCanvas palette=palette_signal settings=settings />
	}
}
