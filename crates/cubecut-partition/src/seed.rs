//! Phase one: seeding pieces with straight rods.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PartitionError, Result};
use crate::grid::Axis;
use crate::partitioner::Partitioner;
use crate::piece::PieceId;

/// How the initial pieces are carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedStrategy {
    /// Rods along a random axis from a random face cell, one per piece.
    #[default]
    RandomRuns,
    /// Full Z rods at every other (x, y) column, walked row by row.
    AlternatingRows,
}

impl<R: Rng> Partitioner<R> {
    /// Voxels a carve at (`axis`, `a`, `b`) would take: the contiguous
    /// occupied run starting at index 0, capped by `max_piece_size`.
    pub fn run_length(&self, axis: Axis, a: usize, b: usize) -> usize {
        let limit = self.settings.max_piece_size.unwrap_or(usize::MAX);
        (0..self.settings.size)
            .take_while(|&i| self.source.is_occupied(axis.coord(i, a, b)))
            .count()
            .min(limit)
    }

    /// Carve the run starting at index 0 along `axis`, with `a` and `b` fixed
    /// on the other two axes, into piece `id`.
    ///
    /// Stops at the grid boundary, at the first vacated voxel, or when the
    /// piece reaches `max_piece_size`. A vacated start voxel makes this a
    /// no-op. Returns the number of voxels moved.
    pub fn carve_run_at(&mut self, id: PieceId, axis: Axis, a: usize, b: usize) -> Result<usize> {
        let room = match self.settings.max_piece_size {
            Some(cap) => cap.saturating_sub(self.pieces[id].len()),
            None => usize::MAX,
        };
        let run = self.run_length(axis, a, b).min(room);
        for i in 0..run {
            self.assign(id, axis.coord(i, a, b))?;
        }
        Ok(run)
    }

    /// Carve a straight run along `axis` at uniformly random coordinates on
    /// the other two axes. Returns the number of voxels moved, possibly zero.
    pub fn carve_straight_run(&mut self, id: PieceId, axis: Axis) -> Result<usize> {
        let n = self.settings.size;
        let a = self.rng.gen_range(0..n);
        let b = self.rng.gen_range(0..n);
        self.carve_run_at(id, axis, a, b)
    }

    /// Seed pieces with the configured strategy.
    pub fn seed(&mut self) -> Result<()> {
        match self.settings.strategy {
            SeedStrategy::RandomRuns => {
                let count = self.settings.effective_piece_count();
                let min_size = self.settings.min_seed_size;
                self.seed_pieces(count, min_size)
            }
            SeedStrategy::AlternatingRows => self.seed_alternating_rows(),
        }
    }

    /// Create `count` pieces, each a rod of at least `min_size` voxels along
    /// a randomly chosen axis.
    ///
    /// Picks whose run is too short are retried with fresh random choices;
    /// the run is measured before anything moves, so rejected picks leave
    /// the grids untouched.
    pub fn seed_pieces(&mut self, count: usize, min_size: usize) -> Result<()> {
        let n = self.settings.size;
        let max_attempts = self.settings.max_seed_attempts;

        for _ in 0..count {
            let piece = self.pieces.len();
            if !self.has_viable_start(min_size) {
                return Err(PartitionError::SeedingExhausted { piece, attempts: 0 });
            }

            let mut attempts = 0;
            let (axis, a, b) = loop {
                if attempts == max_attempts {
                    return Err(PartitionError::SeedingExhausted { piece, attempts });
                }
                attempts += 1;

                let axis = Axis::ALL[self.rng.gen_range(0..Axis::ALL.len())];
                let a = self.rng.gen_range(0..n);
                let b = self.rng.gen_range(0..n);
                if self.run_length(axis, a, b) >= min_size.max(1) {
                    break (axis, a, b);
                }
            };

            let id = self.new_piece();
            let moved = self.carve_run_at(id, axis, a, b)?;
            debug!(piece = id, %axis, a, b, moved, attempts, "seeded piece");
        }
        Ok(())
    }

    /// Carve a full Z rod at every other (x, y) column, starting with (0, 0)
    /// and alternating across row boundaries.
    pub fn seed_alternating_rows(&mut self) -> Result<()> {
        let n = self.settings.size;
        let mut carve = true;
        for x in 0..n {
            for y in 0..n {
                if carve {
                    let id = self.new_piece();
                    let moved = self.carve_run_at(id, Axis::Z, x, y)?;
                    debug!(piece = id, x, y, moved, "seeded row");
                }
                carve = !carve;
            }
        }
        Ok(())
    }

    fn has_viable_start(&self, min_size: usize) -> bool {
        let n = self.settings.size;
        Axis::ALL.iter().any(|&axis| {
            (0..n).any(|a| (0..n).any(|b| self.run_length(axis, a, b) >= min_size.max(1)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::PartitionSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn partitioner(size: usize, pieces: usize) -> Partitioner<StdRng> {
        let settings = PartitionSettings {
            size,
            piece_count: Some(pieces),
            ..Default::default()
        };
        Partitioner::new(settings, StdRng::seed_from_u64(17)).unwrap()
    }

    #[test]
    fn test_full_grid_carve_is_full_rod() {
        let mut p = partitioner(5, 1);
        let id = p.new_piece();
        let moved = p.carve_run_at(id, Axis::X, 2, 3).unwrap();

        assert_eq!(moved, 5);
        let voxels: BTreeSet<Coord> = p.pieces()[id].voxels().collect();
        let expected: BTreeSet<Coord> = (0..5).map(|x| Coord::new(x, 2, 3)).collect();
        assert_eq!(voxels, expected);
    }

    #[test]
    fn test_random_carve_on_full_grid_is_full_rod() {
        let mut p = partitioner(4, 1);
        let id = p.new_piece();
        let moved = p.carve_straight_run(id, Axis::X).unwrap();

        assert_eq!(moved, 4);
        let voxels: Vec<Coord> = p.pieces()[id].voxels().collect();
        let (y, z) = (voxels[0].y, voxels[0].z);
        assert!(voxels.iter().all(|c| c.y == y && c.z == z));
        assert_eq!(voxels.iter().map(|c| c.x).collect::<Vec<_>>(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_carve_stops_at_vacated_voxel() {
        let mut p = partitioner(5, 1);
        let blocker = p.new_piece();
        p.assign(blocker, Coord::new(1, 3, 2)).unwrap();

        let id = p.new_piece();
        let moved = p.carve_run_at(id, Axis::Y, 1, 2).unwrap();
        assert_eq!(moved, 3);
        assert!(p.pieces()[id].grid().is_occupied(Coord::new(1, 2, 2)));
        assert!(!p.pieces()[id].grid().is_occupied(Coord::new(1, 4, 2)));
    }

    #[test]
    fn test_carve_at_vacated_start_is_noop() {
        let mut p = partitioner(4, 1);
        let first = p.new_piece();
        p.carve_run_at(first, Axis::Z, 1, 1).unwrap();

        let second = p.new_piece();
        let source_before = p.source().clone();
        let first_before = p.pieces()[first].clone();

        let moved = p.carve_run_at(second, Axis::Z, 1, 1).unwrap();
        assert_eq!(moved, 0);
        assert_eq!(p.source(), &source_before);
        assert_eq!(p.pieces()[first], first_before);
        assert!(p.pieces()[second].is_empty());
    }

    #[test]
    fn test_carve_respects_cap() {
        let settings = PartitionSettings {
            size: 6,
            piece_count: Some(60),
            max_piece_size: Some(4),
            ..Default::default()
        };
        let mut p = Partitioner::new(settings, StdRng::seed_from_u64(1)).unwrap();
        let id = p.new_piece();
        assert_eq!(p.run_length(Axis::X, 0, 0), 4);
        assert_eq!(p.carve_run_at(id, Axis::X, 0, 0).unwrap(), 4);
        assert_eq!(p.carve_run_at(id, Axis::X, 1, 0).unwrap(), 0);
    }

    #[test]
    fn test_seed_pieces_creates_rods() {
        let mut p = partitioner(6, 14);
        p.seed().unwrap();

        assert_eq!(p.pieces().len(), 14);
        for piece in p.pieces() {
            let voxels: Vec<Coord> = piece.voxels().collect();
            assert!(!voxels.is_empty());
            let straight = Axis::ALL.iter().any(|&axis| {
                let first = voxels[0];
                voxels.iter().enumerate().all(|(i, c)| {
                    c.along(axis) == i
                        && Axis::ALL
                            .iter()
                            .filter(|&&other| other != axis)
                            .all(|&other| c.along(other) == first.along(other))
                })
            });
            assert!(straight, "{} is not a rod from a face", piece.name());
        }
    }

    #[test]
    fn test_seed_exhaustion_reported() {
        // Vacate every face cell so no rod can start.
        let mut p = partitioner(2, 1);
        let blocker = p.new_piece();
        for c in p.source().clone().occupied() {
            if c.x == 0 || c.y == 0 || c.z == 0 {
                p.assign(blocker, c).unwrap();
            }
        }

        let err = p.seed_pieces(1, 1).unwrap_err();
        assert!(matches!(err, PartitionError::SeedingExhausted { piece: 1, .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_alternating_rows() {
        let settings = PartitionSettings {
            size: 3,
            strategy: SeedStrategy::AlternatingRows,
            ..Default::default()
        };
        let mut p = Partitioner::new(settings, StdRng::seed_from_u64(0)).unwrap();
        p.seed().unwrap();

        assert_eq!(p.pieces().len(), 5);
        assert!(p.pieces().iter().all(|piece| piece.len() == 3));
        // (0,0), (0,2), (1,1), (2,0), (2,2)
        assert_eq!(p.owner_of(Coord::new(1, 1, 2)), Some(2));
        assert_eq!(p.owner_of(Coord::new(0, 1, 0)), None);
        assert_eq!(p.source().len(), 12);
    }
}
