//! Small value types shared across the background renderer.

/// An RGB triple as supplied by the palette provider (each channel 0-255).
pub type Rgb = [u8; 3];

/// A point in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to another point.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}

	/// Moves `length` along `angle` (radians, canvas y axis pointing down).
	pub fn offset_polar(self, angle: f64, length: f64) -> Self {
		Self {
			x: self.x + angle.cos() * length,
			y: self.y + angle.sin() * length,
		}
	}
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn area(self) -> f64 {
		self.width * self.height
	}

	pub fn center(self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Whether `p` lies inside the bounds grown by `margin` on every side.
	pub fn contains_padded(self, p: Point, margin: f64) -> bool {
		p.x >= -margin
			&& p.x <= self.width + margin
			&& p.y >= -margin
			&& p.y <= self.height + margin
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn padded_bounds_are_inclusive() {
		let b = Bounds::new(100.0, 50.0);
		assert!(b.contains_padded(Point::new(-10.0, 60.0), 10.0));
		assert!(!b.contains_padded(Point::new(-10.1, 0.0), 10.0));
		assert!(!b.contains_padded(Point::new(0.0, 60.5), 10.0));
	}

	#[test]
	fn polar_offset_follows_canvas_axes() {
		let p = Point::new(0.0, 0.0).offset_polar(std::f64::consts::FRAC_PI_2, 10.0);
		assert!(p.x.abs() < 1e-9);
		assert!((p.y - 10.0).abs() < 1e-9);
	}
}
