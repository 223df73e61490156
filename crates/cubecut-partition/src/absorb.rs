//! Phase two: sweeping leftover voxels into adjacent pieces.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PartitionError, Result};
use crate::grid::Coord;
use crate::partitioner::Partitioner;
use crate::piece::PieceId;

/// How a leftover voxel picks the piece it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbsorbRule {
    /// Smallest adjacent piece; ties go to the lowest piece id.
    #[default]
    Smallest,
    /// Uniform pick among face contacts, so a piece touching the voxel on
    /// several faces is proportionally likelier.
    RandomFace,
}

impl<R: Rng> Partitioner<R> {
    /// Pieces touching `coord` across a face, one entry per contact, in
    /// -x, +x, -y, +y, -z, +z order.
    pub fn adjacent_pieces(&self, coord: Coord) -> Vec<PieceId> {
        self.source
            .neighbors(coord)
            .filter_map(|n| self.owner_of(n))
            .collect()
    }

    fn has_room(&self, id: PieceId) -> bool {
        self.settings
            .max_piece_size
            .map_or(true, |cap| self.pieces[id].len() < cap)
    }

    fn pick_piece(&mut self, coord: Coord) -> Option<PieceId> {
        let contacts: Vec<PieceId> = self
            .adjacent_pieces(coord)
            .into_iter()
            .filter(|&id| self.has_room(id))
            .collect();

        match self.settings.absorb {
            AbsorbRule::Smallest => contacts
                .iter()
                .copied()
                .min_by_key(|&id| (self.pieces[id].len(), id)),
            AbsorbRule::RandomFace => contacts.choose(&mut self.rng).copied(),
        }
    }

    /// One sweep over the grid in nested x, y, z order.
    ///
    /// Each voxel still in the source joins an adjacent piece that is below
    /// `max_piece_size`. Voxels absorbed earlier in the sweep already count
    /// as neighbours for later ones. Voxels with no eligible neighbour are
    /// left for the next sweep. Returns the number of voxels moved.
    pub fn absorb_remaining(&mut self) -> Result<usize> {
        let pending: Vec<Coord> = self.source.occupied().collect();
        let mut moved = 0;
        for coord in pending {
            if let Some(id) = self.pick_piece(coord) {
                self.assign(id, coord)?;
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Sweep until the source grid is empty. Returns the number of sweeps.
    ///
    /// A sweep that moves nothing while voxels remain means the size cap
    /// walled them off; that is reported as [`PartitionError::Stalled`].
    pub fn drain(&mut self) -> Result<usize> {
        let mut sweeps = 0;
        while !self.source.is_empty() {
            let moved = self.absorb_remaining()?;
            sweeps += 1;
            let remaining = self.source.len();
            debug!(sweep = sweeps, moved, remaining, "absorption sweep");
            if moved == 0 {
                return Err(PartitionError::Stalled { remaining });
            }
        }
        Ok(sweeps)
    }
}
