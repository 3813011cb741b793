//! Frame composition for the background.
//!
//! Layers are drawn in a fixed order, each inside its own scoped layer:
//! 1. Animated linear gradient (source-over)
//! 2. Star-to-star proximity links (screen)
//! 3. Pointer-to-star links, when enabled and the pointer is over the canvas (screen)
//! 4. Shooting stars (screen)
//! 5. Stars: soft glow, then solid core (screen)

use super::particles::MIN_RADIUS;
use super::shooting::GLOW_THRESHOLD;
use super::state::BackgroundState;
use super::surface::{Composite, GradientStop, Surface, with_layer};
use super::theme::{Color, Palette};
use super::types::{Bounds, Point};

/// Glow radius relative to the star radius.
const GLOW_SCALE: f64 = 5.0;

/// Counts of what one frame drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	pub connections: usize,
	pub pointer_links: usize,
	pub shooting_stars: usize,
	pub stars: usize,
}

/// Alpha of a link of length `d`: quadratic falloff to zero at `max`.
pub fn link_alpha(d: f64, max: f64, base_alpha: f64) -> f64 {
	(1.0 - d / max).powi(2) * base_alpha
}

/// Endpoints and stops of the background gradient at renderer time `time`.
///
/// Each endpoint sweeps on its own sine/cosine so the color drift never
/// repeats on a short cycle.
pub fn background_gradient(
	bounds: Bounds,
	palette: &Palette,
	time: f64,
	intensity: f64,
) -> (Point, Point, [GradientStop; 3]) {
	let t = time * 0.05;
	let Bounds { width, height } = bounds;
	let from = Point::new(
		width * (0.5 + 0.5 * (t * 0.5).sin()),
		height * (0.5 + 0.5 * (t * 0.3).cos()),
	);
	let to = Point::new(
		width * (0.5 - 0.5 * (t * 0.7).sin()),
		height * (0.5 - 0.5 * (t * 0.4).cos()),
	);
	let stops = [
		GradientStop::new(0.0, palette.get(0).with_alpha(intensity)),
		GradientStop::new(0.5, palette.get(1).with_alpha(intensity)),
		GradientStop::new(1.0, palette.get(2).with_alpha(intensity)),
	];
	(from, to, stops)
}

/// Renders the complete background for the current state.
pub fn render<S: Surface + ?Sized>(state: &BackgroundState, surface: &mut S) -> FrameStats {
	surface.clear(state.bounds);

	with_layer(surface, Composite::SourceOver, |s| draw_background(state, s));

	let connections = with_layer(surface, Composite::Screen, |s| draw_connections(state, s));

	let pointer_links = match state.pointer {
		Some(pointer) if state.settings.mouse_interaction.enabled => {
			with_layer(surface, Composite::Screen, |s| draw_pointer_links(state, pointer, s))
		}
		_ => 0,
	};

	let shooting_stars = if state.settings.shooting_stars_active() {
		with_layer(surface, Composite::Screen, |s| draw_shooting_stars(state, s))
	} else {
		0
	};

	let stars = with_layer(surface, Composite::Screen, |s| draw_stars(state, s));

	FrameStats {
		connections,
		pointer_links,
		shooting_stars,
		stars,
	}
}

fn draw_background<S: Surface + ?Sized>(state: &BackgroundState, surface: &mut S) {
	let (from, to, stops) = background_gradient(
		state.bounds,
		&state.palette,
		state.time,
		state.settings.color_mode.background_intensity,
	);
	surface.fill_linear_gradient(state.bounds, from, to, &stops);
}

/// Draws links between nearby stars. Returns the number of segments drawn.
///
/// Each pair is visited from both ends; the duplicate stroke is harmless. Once
/// the configured cap is hit the remaining candidates are skipped for this frame.
pub fn draw_connections<S: Surface + ?Sized>(state: &BackgroundState, surface: &mut S) -> usize {
	let max = state.density.connection_distance;
	if max <= 0.0 {
		return 0;
	}
	let conn = &state.settings.connection;
	let cap = state.settings.connection_cap().unwrap_or(usize::MAX);
	let blend = state.settings.color_mode.connection_color_sync;
	let accent = state.palette.accent();
	let stars = &state.field.stars;

	let mut drawn = 0;
	'stars: for (i, a) in stars.iter().enumerate() {
		for j in state.grid.neighbors(a.position) {
			if drawn >= cap {
				break 'stars;
			}
			if i == j {
				continue;
			}
			let Some(b) = stars.get(j) else {
				continue;
			};
			let d = a.position.distance(b.position);
			if d >= max {
				continue;
			}
			let color = if blend { a.color.blend(b.color) } else { accent };
			surface.stroke_line(
				a.position,
				b.position,
				color.with_alpha(link_alpha(d, max, conn.base_alpha)),
				conn.line_width,
			);
			drawn += 1;
		}
	}
	drawn
}

/// Draws links from the pointer to nearby stars. Returns the number drawn.
fn draw_pointer_links<S: Surface + ?Sized>(
	state: &BackgroundState,
	pointer: Point,
	surface: &mut S,
) -> usize {
	let max = state.settings.mouse_interaction.distance;
	if max <= 0.0 {
		return 0;
	}
	let accent = state.palette.accent();
	let width = state.settings.connection.line_width;

	let mut drawn = 0;
	for j in state.grid.neighbors(pointer) {
		let Some(star) = state.field.stars.get(j) else {
			continue;
		};
		let d = pointer.distance(star.position);
		if d < max {
			surface.stroke_line(pointer, star.position, accent.with_alpha(link_alpha(d, max, 1.0)), width);
			drawn += 1;
		}
	}
	drawn
}

fn draw_shooting_stars<S: Surface + ?Sized>(state: &BackgroundState, surface: &mut S) -> usize {
	let cfg = &state.settings.shooting_stars;
	for streak in &state.shooting.active {
		let tail = streak.tail(cfg.length);
		let head: Color = streak.color.with_alpha(1.0);

		if cfg.glow && streak.intensity > GLOW_THRESHOLD {
			surface.stroke_fading_line(
				streak.position,
				tail,
				head.fade(0.3 * streak.intensity),
				head.with_alpha(0.0),
				cfg.line_width * 3.0,
			);
		}
		surface.stroke_fading_line(streak.position, tail, head, head.with_alpha(0.0), cfg.line_width);
	}
	state.shooting.len()
}

fn draw_stars<S: Surface + ?Sized>(state: &BackgroundState, surface: &mut S) -> usize {
	let pulse = &state.settings.pulsating_stars;
	let glow_opacity = state.settings.star_glow_opacity;

	for star in &state.field.stars {
		let radius = star.radius(state.time, pulse);
		let glow_radius = (radius * GLOW_SCALE).max(MIN_RADIUS);

		surface.fill_radial_glow(
			star.position,
			glow_radius,
			star.color.with_alpha(star.opacity * glow_opacity),
			star.color.with_alpha(0.0),
		);
		surface.fill_circle(star.position, radius, star.color.with_alpha(star.opacity));
	}
	state.field.len()
}
