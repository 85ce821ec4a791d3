//! Cell geometry of an unrefined Cartesian grid (legacy v2 ids).
//!
//! Cell ids are 1-based linear indices, first axis fastest:
//!
//! ```text
//! idx = id - 1
//! ix  = idx % nx
//! iy  = (idx / nx) % ny
//! iz  = idx / (nx * ny)
//! center[a] = grid_start[a] + cell_length[a] * (0.5 + i[a])
//! ```
//!
//! Whether `total_cells == nx * ny * nz` holds is never checked here.

use anyhow::Result;

use crate::error::SnapError;
use crate::meta::SnapshotMetadata;

/// Integer (x, y, z) position of a cell on the level-0 grid.
pub fn cell_index(cell_id: u64, dims: [u64; 3]) -> Result<[u64; 3]> {
    if cell_id == 0 {
        return Err(SnapError::InvalidCellId { cell_id }.into());
    }
    if dims.contains(&0) {
        return Err(SnapError::InvalidGrid { dims }.into());
    }
    let [nx, ny, _] = dims;
    let Some(plane) = nx.checked_mul(ny) else {
        return Err(SnapError::InvalidGrid { dims }.into());
    };
    let idx = cell_id - 1;
    Ok([idx % nx, (idx / nx) % ny, idx / plane])
}

/// Center coordinate of a cell, from the grid origin and level-0 cell length.
pub fn cell_center(cell_id: u64, meta: &SnapshotMetadata) -> Result<[f64; 3]> {
    let g = &meta.grid;
    let index = cell_index(cell_id, g.ref_lvl_0_cells)?;
    Ok(center_of(index, g.grid_start, g.lvl_0_cell_length))
}

#[inline]
pub(crate) fn center_of(index: [u64; 3], start: [f64; 3], length: [f64; 3]) -> [f64; 3] {
    [0usize, 1, 2].map(|a| start[a] + length[a] * (0.5 + index[a] as f64))
}
