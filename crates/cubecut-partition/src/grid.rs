//! Cubic occupancy grids and voxel transfers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PartitionError, Result};

/// Integer voxel coordinate, each component in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X index.
    pub x: usize,
    /// Y index.
    pub y: usize,
    /// Z index.
    pub z: usize,
}

impl Coord {
    /// Create a new coordinate.
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Component along `axis`.
    pub fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Build a coordinate with `index` along this axis and `a`, `b` on the
    /// remaining two axes, in X, Y, Z order.
    ///
    /// For `Axis::Y`, `a` is the X component and `b` the Z component.
    pub fn coord(self, index: usize, a: usize, b: usize) -> Coord {
        match self {
            Axis::X => Coord::new(index, a, b),
            Axis::Y => Coord::new(a, index, b),
            Axis::Z => Coord::new(a, b, index),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// A cubic occupancy grid of side `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
    count: usize,
}

impl Grid {
    /// Create a grid with every cell empty.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size * size],
            count: 0,
        }
    }

    /// Create a grid with every cell occupied.
    pub fn full(size: usize) -> Self {
        let volume = size * size * size;
        Self {
            size,
            cells: vec![true; volume],
            count: volume,
        }
    }

    /// Create a grid with exactly the given cells occupied.
    ///
    /// Coordinates outside the grid are skipped.
    pub fn from_coords(size: usize, coords: impl IntoIterator<Item = Coord>) -> Self {
        let mut grid = Self::empty(size);
        for coord in coords {
            if let Some(i) = grid.index(coord) {
                if !grid.cells[i] {
                    grid.cells[i] = true;
                    grid.count += 1;
                }
            }
        }
        grid
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True if `coord` lies inside the grid.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.size && coord.y < self.size && coord.z < self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.x * self.size + coord.y) * self.size + coord.z)
    }

    /// True if `coord` is inside the grid and occupied.
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.index(coord).is_some_and(|i| self.cells[i])
    }

    /// All coordinates of the grid in nested x, y, z order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let n = self.size;
        (0..n).flat_map(move |x| (0..n).flat_map(move |y| (0..n).map(move |z| Coord::new(x, y, z))))
    }

    /// Occupied coordinates in nested x, y, z order.
    pub fn occupied(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |c| self.is_occupied(*c))
    }

    /// Face-adjacent neighbours of `coord` that lie inside the grid.
    ///
    /// Order is -x, +x, -y, +y, -z, +z.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        let n = self.size;
        let Coord { x, y, z } = coord;
        [
            x.checked_sub(1).map(|x| Coord::new(x, y, z)),
            (x + 1 < n).then(|| Coord::new(x + 1, y, z)),
            y.checked_sub(1).map(|y| Coord::new(x, y, z)),
            (y + 1 < n).then(|| Coord::new(x, y + 1, z)),
            z.checked_sub(1).map(|z| Coord::new(x, y, z)),
            (z + 1 < n).then(|| Coord::new(x, y, z + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Move one voxel from `self` into `dest`.
    ///
    /// The voxel must be occupied here and empty in `dest`; anything else is
    /// reported as [`PartitionError::InvariantViolation`] and neither grid is
    /// touched.
    pub fn transfer(&mut self, dest: &mut Grid, coord: Coord) -> Result<()> {
        let source_occupied = self.is_occupied(coord);
        let dest_occupied = dest.is_occupied(coord);
        match (self.index(coord), dest.index(coord)) {
            (Some(from), Some(to)) if source_occupied && !dest_occupied => {
                self.cells[from] = false;
                self.count -= 1;
                dest.cells[to] = true;
                dest.count += 1;
                Ok(())
            }
            _ => Err(PartitionError::InvariantViolation {
                coord,
                source_occupied,
                dest_occupied,
            }),
        }
    }
}

/// Layer dump: one bracketed block per X slice, one row per Y, one digit per Z.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.size {
            writeln!(f, "[")?;
            for y in 0..self.size {
                write!(f, " [")?;
                for z in 0..self.size {
                    let digit = if self.is_occupied(Coord::new(x, y, z)) { '1' } else { '0' };
                    write!(f, "{digit}")?;
                }
                writeln!(f, "]")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
