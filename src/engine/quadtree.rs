//! Barnes-Hut quadtree for approximate many-body repulsion.
//!
//! Each cell stores the body count and centre of mass of everything below
//! it. When evaluating the force on a body, a cell that is far away relative
//! to its width (`width / distance < theta`) is treated as one body at its
//! centre of mass, bringing the pass from O(n²) down to roughly O(n log n).

/// Bodies closer than this can't be separated by subdivision; they share a leaf.
const MAX_DEPTH: usize = 24;

#[derive(Clone, Debug)]
struct Cell {
	x0: f64,
	y0: f64,
	size: f64,
	mass: f64,
	sum_x: f64,
	sum_y: f64,
	children: [Option<usize>; 4],
	bodies: Vec<usize>,
	leaf: bool,
}

impl Cell {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			mass: 0.0,
			sum_x: 0.0,
			sum_y: 0.0,
			children: [None; 4],
			bodies: Vec::new(),
			leaf: true,
		}
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let half = self.size / 2.0;
		let east = x >= self.x0 + half;
		let south = y >= self.y0 + half;
		(east as usize) | ((south as usize) << 1)
	}

	fn child_origin(&self, q: usize) -> (f64, f64) {
		let half = self.size / 2.0;
		(
			self.x0 + if q & 1 == 1 { half } else { 0.0 },
			self.y0 + if q & 2 == 2 { half } else { 0.0 },
		)
	}

	fn contains(&self, (x, y): (f64, f64)) -> bool {
		x >= self.x0 && x < self.x0 + self.size && y >= self.y0 && y < self.y0 + self.size
	}

	fn center_of_mass(&self) -> (f64, f64) {
		(self.sum_x / self.mass, self.sum_y / self.mass)
	}
}

/// Spatial index over a snapshot of body positions.
#[derive(Clone, Debug)]
pub(crate) struct QuadTree {
	cells: Vec<Cell>,
	positions: Vec<(f64, f64)>,
}

impl QuadTree {
	/// Builds a tree over `positions`. Non-finite positions are skipped.
	pub fn build(positions: Vec<(f64, f64)>) -> Self {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in positions.iter().filter(|p| p.0.is_finite() && p.1.is_finite()) {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		let mut tree = Self {
			cells: Vec::with_capacity(positions.len() * 2 + 1),
			positions,
		};
		if !min_x.is_finite() {
			return tree;
		}
		// Pad so bodies on the max edge still fall strictly inside.
		let size = (max_x - min_x).max(max_y - min_y).max(1.0) * 1.0001;
		tree.cells.push(Cell::new(min_x, min_y, size));
		for body in 0..tree.positions.len() {
			let (x, y) = tree.positions[body];
			if x.is_finite() && y.is_finite() {
				tree.insert(0, body, 0);
			}
		}
		tree
	}

	fn insert(&mut self, cell: usize, body: usize, depth: usize) {
		let (x, y) = self.positions[body];
		{
			let c = &mut self.cells[cell];
			c.mass += 1.0;
			c.sum_x += x;
			c.sum_y += y;
		}
		if self.cells[cell].leaf {
			if self.cells[cell].bodies.is_empty() || depth >= MAX_DEPTH {
				self.cells[cell].bodies.push(body);
				return;
			}
			// Split: push the resident bodies one level down.
			let residents = std::mem::take(&mut self.cells[cell].bodies);
			self.cells[cell].leaf = false;
			for resident in residents {
				self.insert_into_child(cell, resident, depth);
			}
		}
		self.insert_into_child(cell, body, depth);
	}

	fn insert_into_child(&mut self, cell: usize, body: usize, depth: usize) {
		let (x, y) = self.positions[body];
		let q = self.cells[cell].quadrant(x, y);
		let child = match self.cells[cell].children[q] {
			Some(child) => child,
			None => {
				let (cx, cy) = self.cells[cell].child_origin(q);
				let size = self.cells[cell].size / 2.0;
				self.cells.push(Cell::new(cx, cy, size));
				let idx = self.cells.len() - 1;
				self.cells[cell].children[q] = Some(idx);
				idx
			}
		};
		self.insert(child, body, depth + 1);
	}

	/// Repulsion acting on `body`, using `pair` to evaluate the force exerted
	/// by a (possibly aggregated) source at `(sx, sy)` with the given mass.
	pub fn force_on(
		&self,
		body: usize,
		theta: f64,
		mut pair: impl FnMut(usize, (f64, f64), (f64, f64), f64) -> (f64, f64),
	) -> (f64, f64) {
		let mut total = (0.0, 0.0);
		if self.cells.is_empty() {
			return total;
		}
		let at = self.positions[body];
		let theta2 = theta * theta;
		let mut stack = vec![0usize];
		while let Some(idx) = stack.pop() {
			let cell = &self.cells[idx];
			if cell.mass == 0.0 {
				continue;
			}
			if cell.leaf {
				for &other in cell.bodies.iter().filter(|&&o| o != body) {
					let f = pair(other, at, self.positions[other], 1.0);
					total.0 += f.0;
					total.1 += f.1;
				}
				continue;
			}
			let com = cell.center_of_mass();
			let (dx, dy) = (com.0 - at.0, com.1 - at.1);
			let d2 = dx * dx + dy * dy;
			// A cell holding the body itself is always opened.
			if d2 > 0.0 && cell.size * cell.size < theta2 * d2 && !cell.contains(at) {
				let f = pair(usize::MAX, at, com, cell.mass);
				total.0 += f.0;
				total.1 += f.1;
			} else {
				stack.extend(cell.children.iter().flatten().copied());
			}
		}
		total
	}

	pub fn len(&self) -> usize {
		self.cells.first().map_or(0, |c| c.mass as usize)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
