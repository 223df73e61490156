#![warn(missing_docs)]

//! Voxel cube partitioning for 3D-printable puzzles.
//!
//! A full N×N×N cube is split into named, disjoint, non-empty pieces in two
//! phases: straight rods are carved from the cube faces to seed the pieces,
//! then every remaining voxel is absorbed into an adjacent piece, sweep after
//! sweep, until the cube is drained.
//!
//! # Example
//!
//! ```
//! use cubecut_partition::{partition, PartitionSettings};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let settings = PartitionSettings {
//!     size: 4,
//!     piece_count: Some(6),
//!     ..Default::default()
//! };
//! let mut rng = StdRng::seed_from_u64(7);
//! let result = partition(&settings, &mut rng).unwrap();
//!
//! assert_eq!(result.total_voxels(), 64);
//! result.verify(None).unwrap();
//! ```

pub mod absorb;
pub mod error;
pub mod grid;
pub mod manifest;
pub mod partitioner;
pub mod piece;
pub mod seed;

pub use absorb::AbsorbRule;
pub use error::{PartitionError, Result};
pub use grid::{Axis, Coord, Grid};
pub use manifest::{Partition, PieceVoxels};
pub use partitioner::Partitioner;
pub use piece::{piece_name, Piece, PieceId};
pub use seed::SeedStrategy;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Partitioning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionSettings {
    /// Side length N of the cube, in voxels.
    pub size: usize,
    /// Number of pieces to seed (defaults to `2N + 2`).
    ///
    /// Ignored by [`SeedStrategy::AlternatingRows`], which derives its own.
    pub piece_count: Option<usize>,
    /// Minimum length of a seed rod.
    pub min_seed_size: usize,
    /// Upper bound on the voxel count of any piece.
    pub max_piece_size: Option<usize>,
    /// How pieces are seeded.
    pub strategy: SeedStrategy,
    /// How leftover voxels pick the piece they join.
    pub absorb: AbsorbRule,
    /// Random picks allowed per piece before seeding gives up.
    pub max_seed_attempts: usize,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            size: 6,
            piece_count: None,
            min_seed_size: 1,
            max_piece_size: None,
            strategy: SeedStrategy::RandomRuns,
            absorb: AbsorbRule::Smallest,
            max_seed_attempts: 10_000,
        }
    }
}

impl PartitionSettings {
    /// Number of voxels in the cube.
    pub fn volume(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Number of pieces the chosen strategy will create.
    pub fn effective_piece_count(&self) -> usize {
        match self.strategy {
            SeedStrategy::RandomRuns => self.piece_count.unwrap_or(self.size * 2 + 2),
            SeedStrategy::AlternatingRows => (self.size * self.size).div_ceil(2),
        }
    }

    /// Validate settings.
    ///
    /// Rejects anything that can never yield a complete partition, including
    /// a size cap too small to hold the whole cube across all pieces.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(PartitionError::InvalidSettings(
                "size must be positive".into(),
            ));
        }

        let pieces = self.effective_piece_count();
        if pieces == 0 {
            return Err(PartitionError::InvalidSettings(
                "piece_count must be positive".into(),
            ));
        }
        if pieces > self.volume() {
            return Err(PartitionError::InvalidSettings(format!(
                "{pieces} pieces cannot all be non-empty in {} voxels",
                self.volume()
            )));
        }

        if self.strategy == SeedStrategy::RandomRuns {
            if self.min_seed_size == 0 || self.min_seed_size > self.size {
                return Err(PartitionError::InvalidSettings(format!(
                    "min_seed_size must be between 1 and {}",
                    self.size
                )));
            }
            if self.max_seed_attempts == 0 {
                return Err(PartitionError::InvalidSettings(
                    "max_seed_attempts must be positive".into(),
                ));
            }
        }

        if let Some(cap) = self.max_piece_size {
            if cap == 0 {
                return Err(PartitionError::InvalidSettings(
                    "max_piece_size must be positive".into(),
                ));
            }
            match self.strategy {
                SeedStrategy::RandomRuns if self.min_seed_size > cap => {
                    return Err(PartitionError::InvalidSettings(format!(
                        "min_seed_size {} exceeds max_piece_size {cap}",
                        self.min_seed_size
                    )));
                }
                SeedStrategy::AlternatingRows if self.size > cap => {
                    return Err(PartitionError::InvalidSettings(format!(
                        "alternating rows need rods of {} voxels but max_piece_size is {cap}",
                        self.size
                    )));
                }
                _ => {}
            }
            let capacity = pieces.saturating_mul(cap);
            if capacity < self.volume() {
                return Err(PartitionError::InvalidSettings(format!(
                    "{pieces} pieces of at most {cap} voxels hold {capacity}, cube has {}",
                    self.volume()
                )));
            }
        }

        Ok(())
    }
}

/// Partition a cube with the given settings.
///
/// This is the main entry point. It:
/// 1. Validates the settings
/// 2. Seeds pieces with straight rods
/// 3. Sweeps leftover voxels into adjacent pieces until the cube is drained
pub fn partition<R: Rng>(settings: &PartitionSettings, rng: R) -> Result<Partition> {
    Partitioner::new(settings.clone(), rng)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(size: usize, pieces: usize, cap: Option<usize>) -> PartitionSettings {
        PartitionSettings {
            size,
            piece_count: Some(pieces),
            max_piece_size: cap,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_settings_valid() {
        let settings = PartitionSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.effective_piece_count(), 14);
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let err = settings(0, 1, None).validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_rejects_bad_min_seed() {
        let mut s = settings(4, 4, None);
        s.min_seed_size = 5;
        assert!(s.validate().is_err());
        s.min_seed_size = 0;
        assert!(s.validate().is_err());
        s.min_seed_size = 3;
        s.max_piece_size = Some(2);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_too_many_pieces() {
        assert!(settings(2, 9, None).validate().is_err());
        assert!(settings(2, 8, None).validate().is_ok());
    }

    #[test]
    fn test_small_cube_covered() {
        let s = settings(3, 9, None);
        let result = partition(&s, StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(result.pieces.len(), 9);
        assert_eq!(result.total_voxels(), 27);
        let union: std::collections::BTreeSet<Coord> = result
            .pieces
            .iter()
            .flat_map(|p| p.voxels.iter().copied())
            .collect();
        let all: std::collections::BTreeSet<Coord> = Grid::full(3).coords().collect();
        assert_eq!(union, all);
        result.verify(None).unwrap();
    }

    #[test]
    fn test_bounded_pieces_respect_cap() {
        let s = settings(6, 20, Some(24));
        let result = partition(&s, StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(result.total_voxels(), 216);
        assert!(result.pieces.iter().all(|p| p.voxels.len() <= 24));
        assert!(result.pieces.iter().all(|p| !p.voxels.is_empty()));
        result.verify(Some(24)).unwrap();
    }

    #[test]
    fn test_infeasible_cap_is_configuration_error() {
        // 20 * 10 = 200 < 216
        let err = partition(&settings(6, 20, Some(10)), StdRng::seed_from_u64(3)).unwrap_err();
        assert!(err.is_configuration());

        // 5 * 10 = 50 < 216
        let err = partition(&settings(6, 5, Some(10)), StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidSettings(_)));
    }

    #[test]
    fn test_same_seed_same_partition() {
        let s = settings(5, 12, Some(30));
        let a = partition(&s, StdRng::seed_from_u64(99)).unwrap();
        let b = partition(&s, StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternating_rows_variant() {
        let s = PartitionSettings {
            size: 4,
            strategy: SeedStrategy::AlternatingRows,
            absorb: AbsorbRule::RandomFace,
            ..Default::default()
        };
        let result = partition(&s, StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(result.pieces.len(), 8);
        result.verify(None).unwrap();
    }

    #[test]
    fn test_min_seed_rods() {
        let mut s = settings(5, 6, None);
        s.min_seed_size = 5;
        let mut partitioner = Partitioner::new(s, StdRng::seed_from_u64(11)).unwrap();
        partitioner.seed().unwrap();
        assert_eq!(partitioner.pieces().len(), 6);
        assert!(partitioner.pieces().iter().all(|p| p.len() == 5));
    }
}
