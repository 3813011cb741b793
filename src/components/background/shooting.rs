//! Shooting stars: short-lived streaks that cross the canvas once.
//!
//! Spawning is a Bernoulli trial per update tick. A streak starts just outside
//! one canvas edge, heads roughly toward the middle of the canvas and is
//! dropped as soon as it leaves the canvas grown by [`EDGE_MARGIN`].

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::settings::ShootingStarSettings;
use super::theme::{Color, Palette};
use super::types::{Bounds, Point};

/// Distance beyond the canvas edges where streaks spawn and expire.
pub const EDGE_MARGIN: f64 = 200.0;

/// Speed multiplier above which a streak gets a glow stroke.
pub const GLOW_THRESHOLD: f64 = 0.8;

/// Keeps spawn headings at least this far from parallel to the spawn edge.
const EDGE_CLEARANCE: f64 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
	Top,
	Bottom,
	Left,
	Right,
}

impl Edge {
	/// Heading that points straight into the canvas from this edge.
	fn inward(self) -> f64 {
		match self {
			Edge::Top => FRAC_PI_2,
			Edge::Bottom => -FRAC_PI_2,
			Edge::Left => 0.0,
			Edge::Right => PI,
		}
	}
}

/// A single streak.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
	pub position: Point,
	pub angle: f64,
	pub speed: f64,
	/// Speed multiplier in `[0.5, 1.0]`, reused as brightness.
	pub intensity: f64,
	/// Palette-independent color key, resolved modulo the palette length.
	pub color_key: usize,
	pub color: Color,
}

impl ShootingStar {
	/// End of the tail, `length` pixels behind the head.
	pub fn tail(&self, length: f64) -> Point {
		self.position.offset_polar(self.angle, -length)
	}
}

/// Wraps `angle` into `(-PI, PI]`.
fn normalize(angle: f64) -> f64 {
	let mut a = angle % (2.0 * PI);
	if a > PI {
		a -= 2.0 * PI;
	} else if a <= -PI {
		a += 2.0 * PI;
	}
	a
}

/// The set of live streaks.
#[derive(Clone, Debug, Default)]
pub struct ShootingStars {
	pub active: Vec<ShootingStar>,
}

impl ShootingStars {
	pub fn len(&self) -> usize {
		self.active.len()
	}

	pub fn is_empty(&self) -> bool {
		self.active.is_empty()
	}

	pub fn clear(&mut self) {
		self.active.clear();
	}

	/// Runs one spawn trial. Returns whether a streak was added.
	pub fn maybe_spawn(
		&mut self,
		rng: &mut fastrand::Rng,
		bounds: Bounds,
		settings: &ShootingStarSettings,
		palette: &Palette,
	) -> bool {
		if rng.f64() >= settings.probability {
			return false;
		}
		self.spawn(rng, bounds, settings, palette);
		true
	}

	/// Adds one streak just outside a random canvas edge.
	pub fn spawn(
		&mut self,
		rng: &mut fastrand::Rng,
		bounds: Bounds,
		settings: &ShootingStarSettings,
		palette: &Palette,
	) {
		let Bounds { width, height } = bounds;
		let edge = match rng.u8(..4) {
			0 => Edge::Top,
			1 => Edge::Bottom,
			2 => Edge::Left,
			_ => Edge::Right,
		};
		let position = match edge {
			Edge::Top => Point::new(rng.f64() * width, -EDGE_MARGIN),
			Edge::Bottom => Point::new(rng.f64() * width, height + EDGE_MARGIN),
			Edge::Left => Point::new(-EDGE_MARGIN, rng.f64() * height),
			Edge::Right => Point::new(width + EDGE_MARGIN, rng.f64() * height),
		};

		// A quarter-turn arc around the direction to the canvas center, kept
		// pointing into the canvas.
		let center = bounds.center();
		let toward_center = (center.y - position.y).atan2(center.x - position.x);
		let heading = toward_center + (rng.f64() - 0.5) * 2.0 * FRAC_PI_4;
		let inward = edge.inward();
		let limit = FRAC_PI_2 - EDGE_CLEARANCE;
		let angle = inward + normalize(heading - inward).clamp(-limit, limit);

		let intensity = 0.5 + rng.f64() * 0.5;
		let color_key = rng.usize(..);
		self.active.push(ShootingStar {
			position,
			angle,
			speed: settings.speed * intensity,
			intensity,
			color_key,
			color: palette.get(color_key),
		});
	}

	/// Advances every streak one tick and drops those outside the padded canvas.
	pub fn advance(&mut self, bounds: Bounds) {
		let mut i = 0;
		while i < self.active.len() {
			let star = &mut self.active[i];
			star.position = star.position.offset_polar(star.angle, star.speed);
			if bounds.contains_padded(star.position, EDGE_MARGIN) {
				i += 1;
			} else {
				self.active.swap_remove(i);
			}
		}
	}

	/// Re-derives streak colors from `palette` by their color keys.
	pub fn recolor(&mut self, palette: &Palette) {
		for star in &mut self.active {
			star.color = palette.get(star.color_key);
		}
	}
}
