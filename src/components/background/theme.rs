//! Colors and palettes for the background.
//!
//! The palette is handed in by the page (usually extracted from an avatar
//! image) and is treated as read-only; a built-in violet palette stands in
//! whenever the supplied one is missing or empty.

use super::types::Rgb;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub const fn from_triple(rgb: Rgb) -> Self {
		Self::rgb(rgb[0], rgb[1], rgb[2])
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Same color with the alpha multiplied by `factor`.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: self.a * factor,
			..self
		}
	}

	/// Channel-wise average of two colors.
	pub fn blend(self, other: Color) -> Self {
		self.lerp(other, 0.5)
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t).round() as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t).round() as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t).round() as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_css_rgb()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	pub fn to_css_rgb(self) -> String {
		format!("rgb({}, {}, {})", self.r, self.g, self.b)
	}
}

/// An ordered list of colors; indices wrap around.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Deep violets, the site's look before any avatar colors are known.
	pub fn violet() -> Self {
		Self {
			colors: vec![
				Color::rgb(26, 0, 55),
				Color::rgb(59, 1, 86),
				Color::rgb(79, 0, 130),
				Color::rgb(147, 0, 255),
				Color::rgb(68, 0, 255),
			],
		}
	}

	/// Builds a palette from provider triples. Returns `None` for an empty list.
	pub fn from_triples(triples: &[Rgb]) -> Option<Self> {
		if triples.is_empty() {
			return None;
		}
		Some(Self {
			colors: triples.iter().copied().map(Color::from_triple).collect(),
		})
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	/// Fixed color used for connection lines when endpoint colors are not blended.
	pub fn accent(&self) -> Color {
		self.get(3)
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::violet()
	}
}
