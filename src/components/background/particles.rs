//! Ambient star field with depth-scaled parallax drift.
//!
//! Stars never integrate a velocity. Each one oscillates around a stable
//! `origin`, with amplitude and frequency scaled by its depth, so positions
//! cannot run away. Leaving the canvas shifts the origin by one canvas
//! dimension, which wraps the star to the opposite edge.

use std::f64::consts::TAU;

use super::settings::{PulseSettings, Settings};
use super::theme::{Color, Palette};
use super::types::{Bounds, Point};

/// Peak parallax offset in pixels for a star at depth 1.
pub const PARALLAX_AMPLITUDE: f64 = 20.0;

/// Smallest radius handed to drawing primitives.
pub const MIN_RADIUS: f64 = 0.01;

/// A single drifting star.
#[derive(Clone, Debug)]
pub struct Star {
	pub origin: Point,
	pub position: Point,
	/// 0.0 = far away, 1.0 = closest.
	pub depth: f64,
	pub size: f64,
	pub phase_x: f64,
	pub phase_y: f64,
	pub pulse_phase: f64,
	pub opacity: f64,
	/// Palette-independent color key. The color is `palette[color_key % len]`,
	/// so any palette width maps onto it.
	pub color_key: usize,
	pub color: Color,
}

impl Star {
	/// Parallax offset from the origin at scaled time `t`.
	fn offset(&self, t: f64, parallax_strength: f64) -> Point {
		let factor = 1.0 + self.depth * parallax_strength;
		let reach = PARALLAX_AMPLITUDE * self.depth;
		Point::new(
			(t * factor + self.phase_x).sin() * reach,
			(t * factor + self.phase_y).cos() * reach,
		)
	}

	/// Rendered radius including the pulse effect, never below [`MIN_RADIUS`].
	pub fn radius(&self, time: f64, pulse: &PulseSettings) -> f64 {
		let mut size = self.size;
		if pulse.enabled {
			let wave = (time * pulse.speed + self.pulse_phase).sin();
			size *= 1.0 + wave * pulse.intensity * self.depth;
		}
		size.max(MIN_RADIUS)
	}
}

/// Owns every ambient star for one canvas layout.
#[derive(Clone, Debug, Default)]
pub struct StarField {
	pub stars: Vec<Star>,
	bounds: Bounds,
}

impl StarField {
	/// Generates `count` stars uniformly over `bounds`.
	///
	/// Depth is `random()^2`, which favors distant (small, dim, slow) stars.
	pub fn generate(
		count: usize,
		bounds: Bounds,
		settings: &Settings,
		palette: &Palette,
		rng: &mut fastrand::Rng,
	) -> Self {
		let size = &settings.star_size;
		let stars = (0..count)
			.map(|i| {
				let depth = rng.f64().powi(2);
				let origin = Point::new(rng.f64() * bounds.width, rng.f64() * bounds.height);
				let color_key = if settings.color_mode.star_color_variation {
					rng.usize(..)
				} else {
					i
				};
				Star {
					origin,
					position: origin,
					depth,
					size: size.min + depth * (size.max - size.min),
					phase_x: rng.f64() * TAU,
					phase_y: rng.f64() * TAU,
					pulse_phase: rng.f64() * TAU,
					opacity: 0.4 + depth * 0.5,
					color_key,
					color: palette.get(color_key),
				}
			})
			.collect();

		Self { stars, bounds }
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn len(&self) -> usize {
		self.stars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stars.is_empty()
	}

	/// Moves every star to its position at scaled time `t` and wraps edges.
	pub fn update(&mut self, t: f64, parallax_strength: f64) {
		let Bounds { width, height } = self.bounds;
		for star in &mut self.stars {
			let offset = star.offset(t, parallax_strength);
			let pos = Point::new(star.origin.x + offset.x, star.origin.y + offset.y);

			if pos.x < 0.0 {
				star.origin.x += width;
			} else if pos.x > width {
				star.origin.x -= width;
			}
			if pos.y < 0.0 {
				star.origin.y += height;
			} else if pos.y > height {
				star.origin.y -= height;
			}

			star.position = Point::new(star.origin.x + offset.x, star.origin.y + offset.y);
		}
	}

	/// Re-derives every star's color from `palette` without moving anything.
	pub fn recolor(&mut self, palette: &Palette) {
		for star in &mut self.stars {
			star.color = palette.get(star.color_key);
		}
	}

	pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
		self.stars.iter().map(|s| s.position)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn field(count: usize, bounds: Bounds, seed: u64) -> StarField {
		let mut rng = fastrand::Rng::with_seed(seed);
		StarField::generate(count, bounds, &Settings::default(), &Palette::default(), &mut rng)
	}

	#[test]
	fn generated_stars_respect_ranges() {
		let settings = Settings::default();
		let f = field(500, Bounds::new(800.0, 600.0), 1);
		assert_eq!(f.len(), 500);
		for s in &f.stars {
			assert!((0.0..=1.0).contains(&s.depth));
			assert!(s.size >= settings.star_size.min && s.size <= settings.star_size.max);
			assert_eq!(s.position, s.origin);
			assert!((0.0..TAU).contains(&s.phase_x));
			assert!((0.0..TAU).contains(&s.pulse_phase));
		}
	}

	#[test]
	fn positions_stay_bounded_over_long_runs() {
		let bounds = Bounds::new(640.0, 480.0);
		let mut f = field(200, bounds, 3);
		let mut t = 0.0;
		for _ in 0..20_000 {
			t += 0.37;
			f.update(t, 0.5);
			for s in &f.stars {
				assert!(s.position.x >= -PARALLAX_AMPLITUDE && s.position.x <= bounds.width + PARALLAX_AMPLITUDE);
				assert!(s.position.y >= -PARALLAX_AMPLITUDE && s.position.y <= bounds.height + PARALLAX_AMPLITUDE);
				assert!(s.origin.x >= -bounds.width && s.origin.x <= 2.0 * bounds.width);
				assert!(s.origin.y >= -bounds.height && s.origin.y <= 2.0 * bounds.height);
			}
		}
	}

	#[test]
	fn star_leaving_left_edge_wraps_to_right() {
		let bounds = Bounds::new(300.0, 300.0);
		let mut f = field(1, bounds, 5);
		let s = &mut f.stars[0];
		s.depth = 1.0;
		s.phase_x = -std::f64::consts::FRAC_PI_2;
		s.origin = Point::new(5.0, 150.0);
		// sin(-pi/2) = -1, so the offset is a full amplitude to the left.
		f.update(0.0, 0.0);
		let s = &f.stars[0];
		assert_eq!(s.origin.x, 305.0);
		assert!((s.position.x - 285.0).abs() < 1e-9);
	}

	#[test]
	fn pulse_radius_is_clamped_positive() {
		let mut f = field(1, Bounds::new(100.0, 100.0), 9);
		let s = &mut f.stars[0];
		s.size = 1.0;
		s.depth = 1.0;
		s.pulse_phase = std::f64::consts::FRAC_PI_2;
		let pulse = PulseSettings {
			enabled: true,
			speed: 0.0,
			intensity: 3.0,
		};
		assert!((s.radius(0.0, &pulse) - 4.0).abs() < 1e-9);
		s.pulse_phase = -std::f64::consts::FRAC_PI_2;
		assert_eq!(s.radius(0.0, &pulse), MIN_RADIUS);
	}

	#[test]
	fn recolor_keeps_positions_and_uses_slots() {
		let mut f = field(50, Bounds::new(400.0, 400.0), 11);
		let before: Vec<Point> = f.positions().collect();
		let palette = Palette::from_triples(&[[255, 0, 0], [0, 0, 255]]).unwrap();
		f.recolor(&palette);
		let after: Vec<Point> = f.positions().collect();
		assert_eq!(before, after);
		for s in &f.stars {
			assert_eq!(s.color, palette.get(s.color_key));
		}
	}

	#[test]
	fn recolor_reaches_every_slot_of_a_wider_palette() {
		let mut f = field(250, Bounds::new(2560.0, 1440.0), 13);
		let narrow = Palette::default();
		assert!(f.stars.iter().all(|s| (0..narrow.len()).any(|i| narrow.get(i) == s.color)));

		let triples: Vec<[u8; 3]> = (0..8u8).map(|i| [i * 30, 255 - i * 30, 100]).collect();
		let wide = Palette::from_triples(&triples).unwrap();
		f.recolor(&wide);

		let mut seen = [false; 8];
		for s in &f.stars {
			let slot = s.color_key % wide.len();
			assert_eq!(s.color, wide.get(slot));
			seen[slot] = true;
		}
		assert!(seen[5..].iter().all(|&hit| hit));
	}

	#[test]
	fn without_variation_keys_follow_star_index() {
		let mut settings = Settings::default();
		settings.color_mode.star_color_variation = false;
		let mut rng = fastrand::Rng::with_seed(2);
		let f = StarField::generate(12, Bounds::new(400.0, 400.0), &settings, &Palette::default(), &mut rng);
		for (i, s) in f.stars.iter().enumerate() {
			assert_eq!(s.color_key, i);
			assert_eq!(s.color, Palette::default().get(i));
		}
	}
}
