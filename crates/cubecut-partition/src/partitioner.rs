//! The partitioner: source grid, pieces and the random source in one place.

use rand::Rng;
use tracing::info;

use crate::error::Result;
use crate::grid::{Coord, Grid};
use crate::manifest::{Partition, PieceVoxels};
use crate::piece::{piece_name, Piece, PieceId};
use crate::PartitionSettings;

/// Owns the source grid, the pieces carved from it and the random source.
///
/// Every voxel move goes through [`Partitioner::assign`], which keeps the
/// owner index in step with the piece grids.
pub struct Partitioner<R> {
    pub(crate) settings: PartitionSettings,
    pub(crate) source: Grid,
    pub(crate) pieces: Vec<Piece>,
    owner: Vec<Option<PieceId>>,
    pub(crate) rng: R,
}

impl<R: Rng> Partitioner<R> {
    /// Create a partitioner over a full cube after validating `settings`.
    pub fn new(settings: PartitionSettings, rng: R) -> Result<Self> {
        settings.validate()?;
        let source = Grid::full(settings.size);
        let owner = vec![None; settings.volume()];
        Ok(Self {
            settings,
            source,
            pieces: Vec::new(),
            owner,
            rng,
        })
    }

    /// Settings in use.
    pub fn settings(&self) -> &PartitionSettings {
        &self.settings
    }

    /// Voxels not yet assigned to any piece.
    pub fn source(&self) -> &Grid {
        &self.source
    }

    /// Pieces in creation order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Piece owning `coord`, if any.
    pub fn owner_of(&self, coord: Coord) -> Option<PieceId> {
        self.owner_index(coord).and_then(|i| self.owner[i])
    }

    fn owner_index(&self, coord: Coord) -> Option<usize> {
        let n = self.settings.size;
        self.source
            .contains(coord)
            .then(|| (coord.x * n + coord.y) * n + coord.z)
    }

    /// Create a new empty piece and return its id.
    pub fn new_piece(&mut self) -> PieceId {
        let id = self.pieces.len();
        self.pieces.push(Piece::new(piece_name(id), self.settings.size));
        id
    }

    /// Move `coord` from the source grid into piece `id`.
    pub(crate) fn assign(&mut self, id: PieceId, coord: Coord) -> Result<()> {
        self.source.transfer(self.pieces[id].grid_mut(), coord)?;
        if let Some(i) = self.owner_index(coord) {
            self.owner[i] = Some(id);
        }
        Ok(())
    }

    /// Seed, drain and hand back the finished partition.
    pub fn run(mut self) -> Result<Partition> {
        self.seed()?;
        let sweeps = self.drain()?;
        info!(
            size = self.settings.size,
            pieces = self.pieces.len(),
            sweeps,
            "cube partitioned"
        );
        Ok(self.into_partition())
    }

    /// Snapshot the pieces as coordinate sets.
    pub fn into_partition(self) -> Partition {
        let pieces = self
            .pieces
            .iter()
            .map(|piece| PieceVoxels {
                name: piece.name().to_string(),
                voxels: piece.voxels().collect(),
            })
            .collect();
        Partition {
            size: self.settings.size,
            pieces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartitionError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn partitioner(size: usize) -> Partitioner<StdRng> {
        let settings = PartitionSettings {
            size,
            piece_count: Some(1),
            ..Default::default()
        };
        Partitioner::new(settings, StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_assign_tracks_owner() {
        let mut p = partitioner(3);
        let a = p.new_piece();
        let b = p.new_piece();
        p.assign(a, Coord::new(0, 0, 0)).unwrap();
        p.assign(b, Coord::new(2, 1, 0)).unwrap();

        assert_eq!(p.owner_of(Coord::new(0, 0, 0)), Some(a));
        assert_eq!(p.owner_of(Coord::new(2, 1, 0)), Some(b));
        assert_eq!(p.owner_of(Coord::new(1, 1, 1)), None);
        assert_eq!(p.source().len(), 25);
        assert_eq!(p.pieces()[b].name(), "piece1");
    }

    #[test]
    fn test_reassign_aborts() {
        let mut p = partitioner(2);
        let a = p.new_piece();
        let b = p.new_piece();
        let c = Coord::new(1, 1, 1);
        p.assign(a, c).unwrap();

        let err = p.assign(b, c).unwrap_err();
        assert!(matches!(err, PartitionError::InvariantViolation { .. }));
        assert_eq!(p.owner_of(c), Some(a));
        assert!(p.pieces()[b].is_empty());
    }

    #[test]
    fn test_into_partition_keeps_creation_order() {
        let mut p = partitioner(2);
        for i in 0..3 {
            let id = p.new_piece();
            p.assign(id, Coord::new(0, 0, i % 2)).ok();
        }
        let partition = p.into_partition();
        let names: Vec<_> = partition.pieces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["piece0", "piece1", "piece2"]);
        assert!(partition.pieces[2].voxels.is_empty());
    }
}
