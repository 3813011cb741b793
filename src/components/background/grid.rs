//! Uniform spatial grid for neighbor queries.
//!
//! Buckets point indices by `(floor(x / cell), floor(y / cell))`. With the cell
//! edge at least as long as the largest query distance, every neighbor of a
//! point lies in the 3x3 block of cells around it. The grid is rebuilt from
//! scratch each update; point counts stay in the hundreds.

use std::collections::HashMap;

use super::types::Point;

/// Integer cell coordinates.
pub type CellKey = (i64, i64);

#[derive(Clone, Debug)]
pub struct SpatialGrid {
	cell_size: f64,
	cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
	pub fn new(cell_size: f64) -> Self {
		Self {
			cell_size: cell_size.max(f64::EPSILON),
			cells: HashMap::new(),
		}
	}

	pub fn cell_size(&self) -> f64 {
		self.cell_size
	}

	/// Changes the cell edge; takes effect on the next rebuild.
	pub fn set_cell_size(&mut self, cell_size: f64) {
		self.cell_size = cell_size.max(f64::EPSILON);
		self.cells.clear();
	}

	pub fn cell_key(&self, p: Point) -> CellKey {
		(
			(p.x / self.cell_size).floor() as i64,
			(p.y / self.cell_size).floor() as i64,
		)
	}

	/// Replaces the grid contents with `positions`, bucketed by enumeration index.
	pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Point>) {
		// Keep bucket allocations around between frames.
		for bucket in self.cells.values_mut() {
			bucket.clear();
		}
		for (idx, p) in positions.into_iter().enumerate() {
			let key = self.cell_key(p);
			self.cells.entry(key).or_default().push(idx);
		}
		self.cells.retain(|_, bucket| !bucket.is_empty());
	}

	/// Indices stored in one cell.
	pub fn cell(&self, key: CellKey) -> &[usize] {
		self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Indices in the cell containing `p` and its eight neighbors.
	pub fn neighbors(&self, p: Point) -> impl Iterator<Item = usize> + '_ {
		let (cx, cy) = self.cell_key(p);
		(-1..=1)
			.flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
			.flat_map(move |key| self.cell(key).iter().copied())
	}

	/// Number of stored indices.
	pub fn len(&self) -> usize {
		self.cells.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn each_point_lands_in_exactly_one_bucket() {
		let mut grid = SpatialGrid::new(50.0);
		let points = [
			Point::new(0.0, 0.0),
			Point::new(49.9, 49.9),
			Point::new(50.0, 0.0),
			Point::new(-1.0, 120.0),
		];
		grid.rebuild(points);
		assert_eq!(grid.len(), points.len());
		assert_eq!(grid.cell((0, 0)), &[0, 1]);
		assert_eq!(grid.cell((1, 0)), &[2]);
		assert_eq!(grid.cell((-1, 2)), &[3]);
	}

	#[test]
	fn rebuild_discards_previous_contents() {
		let mut grid = SpatialGrid::new(10.0);
		grid.rebuild([Point::new(5.0, 5.0), Point::new(95.0, 5.0)]);
		grid.rebuild([Point::new(95.0, 5.0)]);
		assert_eq!(grid.len(), 1);
		assert!(grid.cell((0, 0)).is_empty());
		assert_eq!(grid.cell((9, 0)), &[0]);
	}

	#[test]
	fn close_pairs_are_always_neighbors() {
		let mut rng = fastrand::Rng::with_seed(7);
		for _ in 0..2000 {
			let distance = 1.0 + rng.f64() * 150.0;
			let cell = distance * (1.0 + rng.f64());
			let a = Point::new(rng.f64() * 2000.0 - 500.0, rng.f64() * 2000.0 - 500.0);
			let b = a.offset_polar(rng.f64() * std::f64::consts::TAU, rng.f64() * distance);

			let mut grid = SpatialGrid::new(cell);
			grid.rebuild([a, b]);
			let (ka, kb) = (grid.cell_key(a), grid.cell_key(b));
			assert!((ka.0 - kb.0).abs() <= 1 && (ka.1 - kb.1).abs() <= 1);
			assert!(grid.neighbors(a).any(|i| i == 1));
			assert!(grid.neighbors(b).any(|i| i == 0));
		}
	}
}
