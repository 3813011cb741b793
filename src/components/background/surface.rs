//! Drawing-surface abstraction used by the render pipeline.
//!
//! Every draw call carries its own color, width and geometry; the only state
//! that spans calls is the compositing mode, which is scoped with
//! [`Surface::push_layer`] / [`Surface::pop_layer`] (see [`with_layer`]) so a
//! layer's settings never leak into the next one.

use super::theme::Color;
use super::types::{Bounds, Point};

/// Compositing mode for a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
	/// Normal alpha blending.
	SourceOver,
	/// Overlapping draws brighten each other.
	Screen,
}

impl Composite {
	pub fn as_css(self) -> &'static str {
		match self {
			Composite::SourceOver => "source-over",
			Composite::Screen => "screen",
		}
	}
}

/// One stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
	pub offset: f64,
	pub color: Color,
}

impl GradientStop {
	pub const fn new(offset: f64, color: Color) -> Self {
		Self { offset, color }
	}
}

/// Target of the background renderer.
///
/// Radii passed to [`Surface::fill_radial_glow`] and [`Surface::fill_circle`]
/// are always strictly positive.
pub trait Surface {
	/// Erases the whole surface.
	fn clear(&mut self, bounds: Bounds);

	/// Fills the whole surface with a linear gradient running `from` -> `to`.
	fn fill_linear_gradient(&mut self, bounds: Bounds, from: Point, to: Point, stops: &[GradientStop]);

	/// Strokes a solid line segment.
	fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);

	/// Strokes a segment whose color fades linearly from `head` (at `from`) to `tail`.
	fn stroke_fading_line(&mut self, from: Point, to: Point, head: Color, tail: Color, width: f64);

	/// Fills a disc with a radial gradient from `inner` at the center to `outer` at the rim.
	fn fill_radial_glow(&mut self, center: Point, radius: f64, inner: Color, outer: Color);

	/// Fills a solid disc.
	fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

	/// Saves the draw state and switches compositing mode.
	fn push_layer(&mut self, composite: Composite);

	/// Restores the draw state saved by the matching `push_layer`.
	fn pop_layer(&mut self);
}

/// Runs `draw` inside a layer with the given compositing mode.
pub fn with_layer<S, R>(surface: &mut S, composite: Composite, draw: impl FnOnce(&mut S) -> R) -> R
where
	S: Surface + ?Sized,
{
	surface.push_layer(composite);
	let out = draw(surface);
	surface.pop_layer();
	out
}
