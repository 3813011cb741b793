//! Leptos component wrapping the animated background canvas.
//!
//! The component owns a full-viewport canvas, mounts a [`Background`] on it
//! once the element exists, forwards palette signal changes as live color
//! updates and tears the renderer down on cleanup.

use leptos::prelude::*;
use log::error;
use web_sys::HtmlCanvasElement;

use super::lifecycle::Background;
use super::settings::Settings;
use super::types::Rgb;

/// Renders the animated starfield behind the page content.
///
/// An empty `palette` uses the built-in colors. Later palette changes recolor
/// the stars in place without restarting the animation.
#[component]
pub fn BackgroundCanvas(
	#[prop(into)] palette: Signal<Vec<Rgb>>,
	#[prop(optional)] settings: Settings,
	#[prop(default = "backgroundCanvas")] id: &'static str,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let background = StoredValue::new_local(None::<Background>);

	Effect::new(move |_| {
		let colors = palette.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};

		let mounted = background.with_value(|bg| match bg {
			Some(bg) => {
				if !colors.is_empty() {
					bg.update_colors(&colors);
				}
				true
			}
			None => false,
		});
		if mounted {
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let initial = (!colors.is_empty()).then_some(colors.as_slice());
		let started = Background::from_canvas(canvas, initial, settings.clone())
			.and_then(|bg| bg.start().map(|()| bg));
		match started {
			Ok(bg) => background.set_value(Some(bg)),
			Err(e) => error!("starfield: failed to start background: {}", e),
		}
	});

	on_cleanup(move || {
		background.try_update_value(|bg| {
			if let Some(bg) = bg.take() {
				bg.destroy();
			}
		});
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id=id
			class="background-canvas"
			style="position: fixed; inset: 0; z-index: -1; display: block;"
		/>
	}
}
