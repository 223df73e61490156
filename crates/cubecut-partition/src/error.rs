//! Error types for cube partitioning.

use thiserror::Error;

use crate::grid::Coord;

/// Errors that can occur while partitioning a cube.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// A voxel transfer hit inconsistent grid state (double assignment).
    ///
    /// This is a bookkeeping bug, not a recoverable condition; the run is
    /// aborted as soon as it is detected.
    #[error(
        "invariant violation at {coord}: source occupied = {source_occupied}, \
         destination occupied = {dest_occupied}"
    )]
    InvariantViolation {
        /// Voxel whose transfer was attempted.
        coord: Coord,
        /// Occupancy of the voxel in the source grid.
        source_occupied: bool,
        /// Occupancy of the voxel in the destination grid.
        dest_occupied: bool,
    },

    /// Settings that can never produce a valid partition.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// No seed run long enough could be carved for a piece.
    #[error("could not seed piece {piece} after {attempts} attempts")]
    SeedingExhausted {
        /// Index of the piece being seeded.
        piece: usize,
        /// Number of random picks tried.
        attempts: usize,
    },

    /// An absorption sweep moved nothing while voxels were still unassigned.
    #[error("absorption stalled with {remaining} voxels unassigned")]
    Stalled {
        /// Voxels still left in the source grid.
        remaining: usize,
    },

    /// A finished partition failed verification.
    #[error("partition verification failed: {0}")]
    Verification(String),
}

impl PartitionError {
    /// True for errors caused by a configuration that cannot be satisfied,
    /// as opposed to bookkeeping bugs or corrupt partitions.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PartitionError::InvalidSettings(_)
                | PartitionError::SeedingExhausted { .. }
                | PartitionError::Stalled { .. }
        )
    }
}

/// Result type for partition operations.
pub type Result<T> = std::result::Result<T, PartitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_grouping() {
        assert!(PartitionError::InvalidSettings("x".into()).is_configuration());
        assert!(PartitionError::Stalled { remaining: 3 }.is_configuration());
        assert!(PartitionError::SeedingExhausted {
            piece: 0,
            attempts: 10
        }
        .is_configuration());

        let violation = PartitionError::InvariantViolation {
            coord: Coord::new(1, 2, 3),
            source_occupied: false,
            dest_occupied: false,
        };
        assert!(!violation.is_configuration());
        assert!(violation.to_string().contains("(1, 2, 3)"));
    }
}
