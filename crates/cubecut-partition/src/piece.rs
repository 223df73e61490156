//! Named pieces carved out of the source grid.

use std::fmt;

use crate::grid::{Coord, Grid};

/// Index of a piece in creation order.
pub type PieceId = usize;

/// Name given to the piece created at `id`.
pub fn piece_name(id: PieceId) -> String {
    format!("piece{id}")
}

/// A named piece: an occupancy grid that only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    name: String,
    grid: Grid,
}

impl Piece {
    /// Create an empty piece over a grid of side `size`.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            grid: Grid::empty(size),
        }
    }

    /// Piece name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Occupancy grid of this piece.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Number of voxels owned.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// True if the piece owns no voxel.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Owned voxels in nested x, y, z order.
    pub fn voxels(&self) -> impl Iterator<Item = Coord> + '_ {
        self.grid.occupied()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cube start: {}", self.name)?;
        write!(f, "{}", self.grid)?;
        writeln!(f, "Cube end: {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_is_empty() {
        let piece = Piece::new(piece_name(4), 3);
        assert_eq!(piece.name(), "piece4");
        assert!(piece.is_empty());
        assert_eq!(piece.voxels().count(), 0);
    }

    #[test]
    fn test_piece_dump_has_markers() {
        let mut source = Grid::full(1);
        let mut piece = Piece::new("solo", 1);
        source.transfer(piece.grid_mut(), Coord::new(0, 0, 0)).unwrap();

        let dump = piece.to_string();
        assert!(dump.starts_with("Cube start: solo\n"));
        assert!(dump.contains(" [1]"));
        assert!(dump.ends_with("Cube end: solo\n"));
    }
}
