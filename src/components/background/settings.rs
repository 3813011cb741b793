//! Typed configuration for the background renderer.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a partial
//! JSON object from the page is merged over the documented defaults. Debug
//! builds reject unknown keys to catch typos in hand-written settings.
//!
//! [`Density`] turns the static settings plus the current canvas size into the
//! numbers the renderer actually uses for a given layout.

use serde::Deserialize;

use super::types::Bounds;

/// Lower bound on the grid cell edge, in pixels.
pub const MIN_CELL_SIZE: f64 = 50.0;

/// Radius range for stars, interpolated by depth.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct SizeRange {
	pub min: f64,
	pub max: f64,
}

impl Default for SizeRange {
	fn default() -> Self {
		Self { min: 0.5, max: 2.8 }
	}
}

/// Proximity connection lines between stars.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct ConnectionSettings {
	/// Upper bound on link distance; small screens derive a shorter one.
	pub distance: f64,
	pub line_width: f64,
	/// Alpha of a zero-length link; falls off quadratically with distance.
	pub base_alpha: f64,
	/// Hard cap on segments drawn per frame.
	pub max_segments: Option<usize>,
}

impl Default for ConnectionSettings {
	fn default() -> Self {
		Self {
			distance: 110.0,
			line_width: 0.8,
			base_alpha: 0.7,
			max_segments: None,
		}
	}
}

/// Size "breathing" of stars.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct PulseSettings {
	pub enabled: bool,
	pub speed: f64,
	pub intensity: f64,
}

impl Default for PulseSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			speed: 0.2,
			intensity: 0.3,
		}
	}
}

/// Shooting star spawning and drawing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct ShootingStarSettings {
	pub enabled: bool,
	/// Chance per update tick of spawning one shooting star.
	pub probability: f64,
	/// Pixels per tick at full speed.
	pub speed: f64,
	/// Tail length in pixels.
	pub length: f64,
	pub line_width: f64,
	/// Draw a wide faint stroke under fast shooting stars.
	pub glow: bool,
}

impl Default for ShootingStarSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			probability: 0.001,
			speed: 15.0,
			length: 150.0,
			line_width: 1.8,
			glow: true,
		}
	}
}

/// Links from the pointer to nearby stars.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct PointerSettings {
	pub enabled: bool,
	pub distance: f64,
}

impl Default for PointerSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			distance: 150.0,
		}
	}
}

/// Reduced workload for constrained devices.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct PerformanceSettings {
	pub enabled: bool,
	pub reduced_stars: usize,
	pub reduced_connections: usize,
	pub disable_shooting_stars: bool,
}

impl Default for PerformanceSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			reduced_stars: 100,
			reduced_connections: 50,
			disable_shooting_stars: false,
		}
	}
}

/// How palette colors are mapped onto the scene.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct ColorMode {
	/// Alpha of the background gradient stops (1.0 = opaque).
	pub background_intensity: f64,
	/// Random palette slot per star; otherwise slots follow star order.
	pub star_color_variation: bool,
	/// Blend endpoint colors for connections instead of the accent color.
	pub connection_color_sync: bool,
}

impl Default for ColorMode {
	fn default() -> Self {
		Self {
			background_intensity: 1.0,
			star_color_variation: true,
			connection_color_sync: false,
		}
	}
}

/// Complete renderer configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(debug_assertions, serde(deny_unknown_fields))]
pub struct Settings {
	/// Upper bound on the number of stars; small screens use fewer.
	pub star_count: usize,
	pub star_size: SizeRange,
	pub star_glow_opacity: f64,
	/// Global time multiplier for parallax drift.
	pub move_speed: f64,
	pub connection: ConnectionSettings,
	pub parallax_strength: f64,
	pub pulsating_stars: PulseSettings,
	pub shooting_stars: ShootingStarSettings,
	pub mouse_interaction: PointerSettings,
	pub performance_mode: PerformanceSettings,
	pub color_mode: ColorMode,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			star_count: 250,
			star_size: SizeRange::default(),
			star_glow_opacity: 0.1,
			move_speed: 0.05,
			connection: ConnectionSettings::default(),
			parallax_strength: 0.5,
			pulsating_stars: PulseSettings::default(),
			shooting_stars: ShootingStarSettings::default(),
			mouse_interaction: PointerSettings::default(),
			performance_mode: PerformanceSettings::default(),
			color_mode: ColorMode::default(),
		}
	}
}

impl Settings {
	/// Parses a partial settings object, filling the rest from defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn shooting_stars_active(&self) -> bool {
		self.shooting_stars.enabled
			&& !(self.performance_mode.enabled && self.performance_mode.disable_shooting_stars)
	}

	/// Minimum milliseconds between physics updates.
	pub fn update_interval_ms(&self) -> f64 {
		if self.performance_mode.enabled { 32.0 } else { 16.0 }
	}

	/// Effective per-frame connection cap, if any.
	pub fn connection_cap(&self) -> Option<usize> {
		let perf = self
			.performance_mode
			.enabled
			.then_some(self.performance_mode.reduced_connections);
		match (self.connection.max_segments, perf) {
			(Some(a), Some(b)) => Some(a.min(b)),
			(a, b) => a.or(b),
		}
	}
}

/// Resolution-dependent parameters derived for one canvas layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
	pub star_count: usize,
	pub connection_distance: f64,
	pub cell_size: f64,
}

impl Density {
	pub fn derive(settings: &Settings, bounds: Bounds) -> Self {
		let area = bounds.area().max(0.0);

		let by_area = ((area / 8000.0).floor() as usize).clamp(50, 500);
		let mut star_count = settings.star_count.min(by_area);
		if settings.performance_mode.enabled {
			star_count = star_count.min(settings.performance_mode.reduced_stars);
		}

		let by_diagonal = (area.sqrt() / 10.0).floor().clamp(60.0, 150.0);
		let connection_distance = settings.connection.distance.min(by_diagonal).max(0.0);

		let pointer_distance = if settings.mouse_interaction.enabled {
			settings.mouse_interaction.distance
		} else {
			0.0
		};
		let cell_size = connection_distance.max(pointer_distance).max(MIN_CELL_SIZE);

		Self {
			star_count,
			connection_distance,
			cell_size,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_merges_over_defaults() {
		let s = Settings::from_json(r#"{"starCount": 40, "connection": {"distance": 0}}"#).unwrap();
		assert_eq!(s.star_count, 40);
		assert_eq!(s.connection.distance, 0.0);
		assert_eq!(s.connection.line_width, 0.8);
		assert!(s.pulsating_stars.enabled);
	}

	#[test]
	#[cfg(debug_assertions)]
	fn unknown_keys_rejected_in_debug() {
		assert!(Settings::from_json(r#"{"starCuont": 40}"#).is_err());
		assert!(Settings::from_json(r#"{"connection": {"distanse": 4}}"#).is_err());
	}

	#[test]
	fn density_scales_with_area() {
		let s = Settings::default();
		let small = Density::derive(&s, Bounds::new(400.0, 300.0));
		assert_eq!(small.star_count, 50);
		assert_eq!(small.connection_distance, 60.0);

		let large = Density::derive(&s, Bounds::new(2560.0, 1440.0));
		assert_eq!(large.star_count, 250);
		assert_eq!(large.connection_distance, 110.0);
		assert!(large.cell_size >= large.connection_distance);
	}

	#[test]
	fn configured_count_caps_density() {
		let s = Settings {
			star_count: 4,
			..Settings::default()
		};
		assert_eq!(Density::derive(&s, Bounds::new(1920.0, 1080.0)).star_count, 4);
	}

	#[test]
	fn performance_mode_limits_work() {
		let mut s = Settings::default();
		s.performance_mode.enabled = true;
		s.performance_mode.disable_shooting_stars = true;
		let d = Density::derive(&s, Bounds::new(2560.0, 1440.0));
		assert_eq!(d.star_count, 100);
		assert_eq!(s.connection_cap(), Some(50));
		assert_eq!(s.update_interval_ms(), 32.0);
		assert!(!s.shooting_stars_active());

		s.connection.max_segments = Some(10);
		assert_eq!(s.connection_cap(), Some(10));
		s.performance_mode.enabled = false;
		assert_eq!(s.connection_cap(), Some(10));
	}

	#[test]
	fn cell_covers_pointer_distance() {
		let mut s = Settings::default();
		s.mouse_interaction.enabled = true;
		s.mouse_interaction.distance = 180.0;
		let d = Density::derive(&s, Bounds::new(1920.0, 1080.0));
		assert_eq!(d.cell_size, 180.0);
	}
}
