//! [`Surface`] implementation backed by a 2D canvas context.

use std::f64::consts::PI;
use std::fmt::Debug;

use log::warn;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::surface::{Composite, GradientStop, Surface};
use super::theme::Color;
use super::types::{Bounds, Point};

/// Logs a failed canvas call and carries on with the frame.
fn tolerate<T, E: Debug>(result: Result<T, E>, what: &str) -> Option<T> {
	match result {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("starfield: failed to {}: {:?}", what, e);
			None
		}
	}
}

/// Draws onto an HTML canvas through its 2D context.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}

	fn add_stops(gradient: &CanvasGradient, stops: &[GradientStop]) {
		for stop in stops {
			tolerate(
				gradient.add_color_stop(stop.offset as f32, &stop.color.to_css()),
				"add gradient stop",
			);
		}
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, bounds: Bounds) {
		self.ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);
	}

	fn fill_linear_gradient(&mut self, bounds: Bounds, from: Point, to: Point, stops: &[GradientStop]) {
		let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
		Self::add_stops(&gradient, stops);

		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill_rect(0.0, 0.0, bounds.width, bounds.height);
	}

	fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn stroke_fading_line(&mut self, from: Point, to: Point, head: Color, tail: Color, width: f64) {
		let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
		Self::add_stops(
			&gradient,
			&[GradientStop::new(0.0, head), GradientStop::new(1.0, tail)],
		);

		#[allow(deprecated)]
		self.ctx.set_stroke_style(&gradient);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn fill_radial_glow(&mut self, center: Point, radius: f64, inner: Color, outer: Color) {
		let Some(gradient) = tolerate(
			self.ctx
				.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius),
			"create radial gradient",
		) else {
			return;
		};
		Self::add_stops(
			&gradient,
			&[GradientStop::new(0.0, inner), GradientStop::new(1.0, outer)],
		);

		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}

	fn push_layer(&mut self, composite: Composite) {
		self.ctx.save();
		let _ = self
			.ctx
			.set_global_composite_operation(composite.as_css());
	}

	fn pop_layer(&mut self) {
		self.ctx.restore();
	}
}
