//! Hand finished pieces to an export sink.

use cubecut_ir::{CubePlacement, PieceSink};
use cubecut_partition::Partition;
use tracing::info;

/// Send every piece of `partition` to `sink` as unit cubes of `unit_mm`.
///
/// Returns the number of pieces written.
pub fn write_pieces<S: PieceSink>(
    partition: &Partition,
    unit_mm: f64,
    sink: &mut S,
) -> cubecut_ir::sink::Result<usize> {
    for piece in &partition.pieces {
        let cubes: Vec<CubePlacement> = piece
            .voxels
            .iter()
            .map(|c| CubePlacement::at_voxel(c.x, c.y, c.z, unit_mm))
            .collect();
        sink.write_piece(&piece.name, &cubes)?;
    }
    info!(pieces = partition.pieces.len(), unit_mm, "exported pieces");
    Ok(partition.pieces.len())
}
