//! Finished partitions: named coordinate sets and their verification.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{PartitionError, Result};
use crate::grid::{Coord, Grid};

/// The voxels owned by one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceVoxels {
    /// Piece name.
    pub name: String,
    /// Owned coordinates, ordered.
    pub voxels: BTreeSet<Coord>,
}

/// A complete partition of an N×N×N cube, pieces in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Side length of the cube.
    pub size: usize,
    /// Pieces in creation order.
    pub pieces: Vec<PieceVoxels>,
}

impl Partition {
    /// Look up a piece by name.
    pub fn get(&self, name: &str) -> Option<&PieceVoxels> {
        self.pieces.iter().find(|p| p.name == name)
    }

    /// Sum of all piece sizes.
    pub fn total_voxels(&self) -> usize {
        self.pieces.iter().map(|p| p.voxels.len()).sum()
    }

    /// Check that the pieces tile the cube exactly.
    ///
    /// Every piece must be non-empty, uniquely named, inside the cube, disjoint
    /// from the others and, when `max_piece_size` is given, no larger than
    /// it; together they must cover every voxel.
    pub fn verify(&self, max_piece_size: Option<usize>) -> Result<()> {
        let bounds = Grid::empty(self.size);
        let mut owners: HashMap<Coord, &str> = HashMap::new();
        let mut names = BTreeSet::new();

        for piece in &self.pieces {
            if !names.insert(piece.name.as_str()) {
                return Err(PartitionError::Verification(format!(
                    "duplicate piece name {}",
                    piece.name
                )));
            }
            if piece.voxels.is_empty() {
                return Err(PartitionError::Verification(format!(
                    "{} is empty",
                    piece.name
                )));
            }
            if let Some(cap) = max_piece_size {
                if piece.voxels.len() > cap {
                    return Err(PartitionError::Verification(format!(
                        "{} has {} voxels, limit is {cap}",
                        piece.name,
                        piece.voxels.len()
                    )));
                }
            }
            for &coord in &piece.voxels {
                if !bounds.contains(coord) {
                    return Err(PartitionError::Verification(format!(
                        "{} owns {coord} outside a cube of side {}",
                        piece.name, self.size
                    )));
                }
                if let Some(other) = owners.insert(coord, &piece.name) {
                    return Err(PartitionError::Verification(format!(
                        "{coord} is owned by both {other} and {}",
                        piece.name
                    )));
                }
            }
        }

        let volume = self.size * self.size * self.size;
        if owners.len() != volume {
            return Err(PartitionError::Verification(format!(
                "{} of {volume} voxels assigned",
                owners.len()
            )));
        }
        Ok(())
    }

    /// Layer dump of every piece, in creation order.
    pub fn render_layers(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            let grid = Grid::from_coords(self.size, piece.voxels.iter().copied());
            let _ = writeln!(out, "Cube start: {}", piece.name);
            let _ = write!(out, "{grid}");
            let _ = writeln!(out, "Cube end: {}", piece.name);
        }
        out
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
