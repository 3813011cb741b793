//! Renderer state and lifecycle, independent of the browser.
//!
//! [`BackgroundState`] owns every star, streak and the spatial grid. The
//! browser layer feeds it frame timestamps and a [`Surface`]; everything else
//! (throttled physics, spawning, palette swaps, teardown) happens here so it
//! can run under plain unit tests.

use log::{debug, info, warn};

use super::grid::SpatialGrid;
use super::particles::StarField;
use super::render::{self, FrameStats};
use super::settings::{Density, Settings};
use super::shooting::ShootingStars;
use super::surface::Surface;
use super::theme::Palette;
use super::types::{Bounds, Point, Rgb};

/// Renderer time advanced per animation callback.
pub const TIME_STEP: f64 = 0.01;

/// `Uninitialized -> Running -> Destroyed`. Resizes stay in `Running`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
	Uninitialized,
	Running,
	Destroyed,
}

/// Complete state of one background instance.
pub struct BackgroundState {
	pub settings: Settings,
	pub palette: Palette,
	pub bounds: Bounds,
	pub density: Density,
	pub field: StarField,
	pub grid: SpatialGrid,
	pub shooting: ShootingStars,
	/// Pointer position while it is over the canvas.
	pub pointer: Option<Point>,
	pub time: f64,
	last_update: Option<f64>,
	lifecycle: Lifecycle,
	rng: fastrand::Rng,
}

impl BackgroundState {
	/// Creates an idle renderer. A missing or empty palette falls back to
	/// [`Palette::violet`].
	pub fn new(settings: Settings, palette: Option<&[Rgb]>, rng: fastrand::Rng) -> Self {
		let palette = match palette {
			Some(triples) => Palette::from_triples(triples).unwrap_or_else(|| {
				warn!("starfield: empty palette supplied, using default colors");
				Palette::default()
			}),
			None => {
				debug!("starfield: no palette supplied, using default colors");
				Palette::default()
			}
		};
		let density = Density::derive(&settings, Bounds::default());

		Self {
			grid: SpatialGrid::new(density.cell_size),
			settings,
			palette,
			bounds: Bounds::default(),
			density,
			field: StarField::default(),
			shooting: ShootingStars::default(),
			pointer: None,
			time: 0.0,
			last_update: None,
			lifecycle: Lifecycle::Uninitialized,
			rng,
		}
	}

	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle
	}

	pub fn is_running(&self) -> bool {
		self.lifecycle == Lifecycle::Running
	}

	/// Lays out the field for `bounds` and enters `Running`.
	/// Returns `false` if the renderer was already started or destroyed.
	pub fn start(&mut self, bounds: Bounds) -> bool {
		if self.lifecycle != Lifecycle::Uninitialized {
			return false;
		}
		self.layout(bounds);
		self.lifecycle = Lifecycle::Running;
		info!(
			"starfield: started at {}x{} with {} stars",
			bounds.width,
			bounds.height,
			self.field.len()
		);
		true
	}

	/// Regenerates the field for new canvas dimensions. In-flight shooting
	/// stars are dropped.
	pub fn resize(&mut self, bounds: Bounds) {
		if self.lifecycle != Lifecycle::Running {
			return;
		}
		self.layout(bounds);
		info!(
			"starfield: resized to {}x{}, {} stars, link distance {}",
			bounds.width,
			bounds.height,
			self.field.len(),
			self.density.connection_distance
		);
	}

	fn layout(&mut self, bounds: Bounds) {
		self.bounds = bounds;
		self.density = Density::derive(&self.settings, bounds);
		self.grid.set_cell_size(self.density.cell_size);
		self.field = StarField::generate(
			self.density.star_count,
			bounds,
			&self.settings,
			&self.palette,
			&mut self.rng,
		);
		self.shooting.clear();
		self.grid.rebuild(self.field.positions());
		self.last_update = None;
	}

	/// One physics tick: star drift and wrap, grid rebuild, shooting stars.
	pub fn update(&mut self) {
		let t = self.time * self.settings.move_speed;
		self.field.update(t, self.settings.parallax_strength);
		self.grid.rebuild(self.field.positions());

		if self.settings.shooting_stars_active() {
			self.shooting.maybe_spawn(
				&mut self.rng,
				self.bounds,
				&self.settings.shooting_stars,
				&self.palette,
			);
		}
		self.shooting.advance(self.bounds);
	}

	fn update_due(&self, now_ms: f64) -> bool {
		match self.last_update {
			None => true,
			Some(last) => now_ms - last > self.settings.update_interval_ms(),
		}
	}

	/// Handles one animation callback at `now_ms`: advances time, runs physics
	/// if the update interval has elapsed, and draws. Returns `None` without
	/// drawing unless the renderer is running.
	pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> Option<FrameStats> {
		if self.lifecycle != Lifecycle::Running {
			return None;
		}
		self.time += TIME_STEP;
		if self.update_due(now_ms) {
			self.update();
			self.last_update = Some(now_ms);
		}
		Some(render::render(self, surface))
	}

	/// Swaps the palette and re-derives star colors in place. An empty list is
	/// ignored. Returns whether the palette changed.
	pub fn update_colors(&mut self, triples: &[Rgb]) -> bool {
		let Some(palette) = Palette::from_triples(triples) else {
			warn!("starfield: ignoring empty palette update");
			return false;
		};
		self.palette = palette;
		self.field.recolor(&self.palette);
		self.shooting.recolor(&self.palette);
		true
	}

	pub fn set_pointer(&mut self, pointer: Option<Point>) {
		self.pointer = pointer;
	}

	/// Enters `Destroyed` and drops all scene contents. Safe to call repeatedly;
	/// returns `true` only on the first call.
	pub fn destroy(&mut self) -> bool {
		if self.lifecycle == Lifecycle::Destroyed {
			return false;
		}
		self.lifecycle = Lifecycle::Destroyed;
		self.field = StarField::default();
		self.shooting.clear();
		self.grid.rebuild(std::iter::empty());
		self.pointer = None;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::super::surface::recording::RecordingSurface;
	use super::super::theme::Color;
	use super::*;

	const RED_BLUE: [Rgb; 2] = [[255, 0, 0], [0, 0, 255]];

	fn state(settings: Settings, palette: Option<&[Rgb]>) -> BackgroundState {
		BackgroundState::new(settings, palette, fastrand::Rng::with_seed(1234))
	}

	#[test]
	fn four_stars_take_palette_colors() {
		let settings = Settings {
			star_count: 4,
			..Settings::default()
		};
		let mut s = state(settings, Some(&RED_BLUE));
		s.start(Bounds::new(800.0, 600.0));
		let mut surface = RecordingSurface::default();
		s.frame(0.0, &mut surface);

		assert_eq!(s.field.len(), 4);
		let allowed = [Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)];
		for star in &s.field.stars {
			assert!(allowed.contains(&star.color));
		}
		let stops = surface.gradient_stops().unwrap();
		assert_eq!(stops[0].color.to_css(), "rgb(255, 0, 0)");
		assert_eq!(stops[1].color.to_css(), "rgb(0, 0, 255)");
	}

	#[test]
	fn empty_or_missing_palette_falls_back() {
		assert_eq!(state(Settings::default(), Some(&[])).palette, Palette::violet());
		assert_eq!(state(Settings::default(), None).palette, Palette::violet());
	}

	#[test]
	fn empty_update_colors_is_a_no_op() {
		let mut s = state(Settings::default(), Some(&RED_BLUE));
		s.start(Bounds::new(800.0, 600.0));
		let before: Vec<Color> = s.field.stars.iter().map(|st| st.color).collect();
		assert!(!s.update_colors(&[]));
		let after: Vec<Color> = s.field.stars.iter().map(|st| st.color).collect();
		assert_eq!(before, after);
		assert_eq!(s.palette, Palette::from_triples(&RED_BLUE).unwrap());
	}

	#[test]
	fn update_colors_keeps_the_field_moving() {
		let mut s = state(Settings::default(), Some(&RED_BLUE));
		s.start(Bounds::new(800.0, 600.0));
		let mut surface = RecordingSurface::default();
		for i in 0..10 {
			s.frame(i as f64 * 20.0, &mut surface);
		}
		let origins: Vec<Point> = s.field.stars.iter().map(|st| st.origin).collect();
		let time = s.time;

		assert!(s.update_colors(&[[0, 255, 0]]));
		assert!(s.is_running());
		assert_eq!(s.time, time);
		let after: Vec<Point> = s.field.stars.iter().map(|st| st.origin).collect();
		assert_eq!(origins, after);
		assert!(s.field.stars.iter().all(|st| st.color == Color::rgb(0, 255, 0)));
	}

	#[test]
	fn updates_are_throttled_but_frames_always_draw() {
		let mut s = state(Settings::default(), None);
		s.start(Bounds::new(800.0, 600.0));
		let mut surface = RecordingSurface::default();

		s.frame(100.0, &mut surface);
		let positions: Vec<Point> = s.field.positions().collect();
		// 10ms later is inside the 16ms window: no physics, but still a draw.
		assert!(s.frame(110.0, &mut surface).is_some());
		assert_eq!(positions, s.field.positions().collect::<Vec<_>>());
		s.frame(140.0, &mut surface);
		assert_ne!(positions, s.field.positions().collect::<Vec<_>>());
	}

	#[test]
	fn resize_regenerates_and_drops_streaks() {
		let mut s = state(Settings::default(), None);
		s.start(Bounds::new(400.0, 300.0));
		assert_eq!(s.field.len(), 50);
		s.settings.shooting_stars.probability = 1.0;
		s.update();
		assert!(!s.shooting.is_empty());

		s.resize(Bounds::new(2560.0, 1440.0));
		assert_eq!(s.lifecycle(), Lifecycle::Running);
		assert_eq!(s.field.len(), 250);
		assert!(s.shooting.is_empty());
		assert_eq!(s.grid.len(), 250);
		assert!(s.field.stars.iter().all(|st| st.origin.x <= 2560.0 && st.origin.y <= 1440.0));
	}

	#[test]
	fn lifecycle_transitions() {
		let mut s = state(Settings::default(), None);
		let mut surface = RecordingSurface::default();
		assert_eq!(s.lifecycle(), Lifecycle::Uninitialized);
		assert!(s.frame(0.0, &mut surface).is_none());

		assert!(s.start(Bounds::new(800.0, 600.0)));
		assert!(!s.start(Bounds::new(800.0, 600.0)));
		assert!(s.frame(0.0, &mut surface).is_some());

		assert!(s.destroy());
		assert!(!s.start(Bounds::new(800.0, 600.0)));
		assert_eq!(s.lifecycle(), Lifecycle::Destroyed);
	}

	#[test]
	fn destroy_twice_then_no_more_drawing() {
		let mut s = state(Settings::default(), None);
		s.start(Bounds::new(800.0, 600.0));
		assert!(s.destroy());
		assert!(!s.destroy());

		let mut surface = RecordingSurface::default();
		assert!(s.frame(16.0, &mut surface).is_none());
		assert!(surface.ops.is_empty());
		s.resize(Bounds::new(100.0, 100.0));
		assert!(s.field.is_empty());
	}

	#[test]
	fn wider_palette_update_reaches_its_extra_colors() {
		let mut s = state(Settings::default(), None);
		s.start(Bounds::new(2560.0, 1440.0));
		assert_eq!(s.field.len(), 250);

		let triples: Vec<Rgb> = (0..8u8).map(|i| [i * 20, 40, 255 - i * 20]).collect();
		assert!(s.update_colors(&triples));
		for extra in &triples[5..] {
			let color = Color::from_triple(*extra);
			assert!(s.field.stars.iter().any(|st| st.color == color));
		}
	}
}
