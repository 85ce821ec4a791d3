//! Legacy (v2) loader: header + (cell id, offset) table + monolithic records,
//! decoded in one pass into a caller-owned per-cell time series.
//!
//! Record layout (212 bytes, LE, packed):
//!
//! ```text
//! off  size  field
//!   0     8  density, population 1
//!   8    24  momentum density, population 1
//!  32     8  total energy density, population 1
//!  40     8  density, population 2
//!  48    24  momentum density, population 2
//!  72     8  total energy density, population 2
//!  80    24  electric current density
//! 104     4  owning rank (i32)
//! 108     8  electric resistivity
//! 116    24  magnetic field
//! 140    24  background B at the +x face
//! 164    24  background B at the +y face
//! 188    24  background B at the +z face
//! ```

use anyhow::{Context, Result};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::config::DecoderConfig;
use crate::consts::{LEGACY_RECORD_SIZE, LEGACY_TABLE_ENTRY_SIZE};
use crate::geometry::cell_center;
use crate::meta::{read_metadata_v2, SimParams, SnapshotMetadata};
use crate::metrics;
use crate::snapshot::SnapshotFile;
use crate::util::{ensure_remaining, read_at, read_f64_array};

/// One cell of one v2 snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegacySample {
    pub center: [f64; 3],
    pub cell_length: [f64; 3],
    pub density_1: f64,
    pub momentum_1: [f64; 3],
    pub energy_1: f64,
    pub density_2: f64,
    pub momentum_2: [f64; 3],
    pub energy_2: f64,
    pub current_density: [f64; 3],
    pub rank: i32,
    pub resistivity: f64,
    pub magnetic_field: [f64; 3],
    pub bg_b_pos_x: [f64; 3],
    pub bg_b_pos_y: [f64; 3],
    pub bg_b_pos_z: [f64; 3],
}

impl LegacySample {
    /// Decode the monolithic record; geometry is supplied by the caller.
    pub fn decode(buf: &[u8], center: [f64; 3], cell_length: [f64; 3]) -> Self {
        debug_assert!(buf.len() >= LEGACY_RECORD_SIZE);
        Self {
            center,
            cell_length,
            density_1: LittleEndian::read_f64(&buf[0..8]),
            momentum_1: read_f64_array(&buf[8..32]),
            energy_1: LittleEndian::read_f64(&buf[32..40]),
            density_2: LittleEndian::read_f64(&buf[40..48]),
            momentum_2: read_f64_array(&buf[48..72]),
            energy_2: LittleEndian::read_f64(&buf[72..80]),
            current_density: read_f64_array(&buf[80..104]),
            rank: LittleEndian::read_i32(&buf[104..108]),
            resistivity: LittleEndian::read_f64(&buf[108..116]),
            magnetic_field: read_f64_array(&buf[116..140]),
            bg_b_pos_x: read_f64_array(&buf[140..164]),
            bg_b_pos_y: read_f64_array(&buf[164..188]),
            bg_b_pos_z: read_f64_array(&buf[188..212]),
        }
    }
}

/// Per-cell time series built up over several v2 files.
///
/// Not synchronized; wrap in a `Mutex` to share between threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    cells: BTreeMap<u64, Vec<LegacySample>>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-if-absent, else append to the cell's sequence.
    pub fn append(&mut self, cell_id: u64, sample: LegacySample) {
        self.cells.entry(cell_id).or_default().push(sample);
    }

    /// Append every sample of `other`, keeping its per-cell order.
    pub fn merge(&mut self, other: TimeSeries) {
        for (cell_id, samples) in other.cells {
            self.cells.entry(cell_id).or_default().extend(samples);
        }
    }

    pub fn get(&self, cell_id: u64) -> Option<&[LegacySample]> {
        self.cells.get(&cell_id).map(|v| v.as_slice())
    }

    /// Number of distinct cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn samples_total(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Cells in ascending id order.
    pub fn iter(&self) -> btree_map::Iter<'_, u64, Vec<LegacySample>> {
        self.cells.iter()
    }

    pub fn cell_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.cells.keys().copied()
    }
}

/// Load one v2 file from `path`, appending one sample per cell to `series`.
///
/// With no accumulator this is a no-op returning `Ok(None)`; the path is not
/// even checked. A path that is not a regular file fails with `NotAFile`.
pub fn load_legacy_snapshot(
    path: &Path,
    series: Option<&mut TimeSeries>,
) -> Result<Option<SimParams>> {
    load_legacy_snapshot_with_config(path, series, &DecoderConfig::from_env())
}

pub fn load_legacy_snapshot_with_config(
    path: &Path,
    series: Option<&mut TimeSeries>,
    cfg: &DecoderConfig,
) -> Result<Option<SimParams>> {
    let Some(series) = series else {
        debug!("legacy: no accumulator, {} skipped", path.display());
        return Ok(None);
    };
    let mut file = SnapshotFile::open_with_config(path, cfg)?;
    let params = load_legacy_from_reader(&mut file, Some(series))
        .with_context(|| format!("load legacy snapshot {}", path.display()))?;
    if let Some(p) = &params {
        info!(
            "legacy: loaded {} (t={}, {} B)",
            path.display(),
            p.sim_time,
            file.len()
        );
    }
    Ok(params)
}

/// Same as [`load_legacy_snapshot`] for an already open stream.
///
/// Samples are appended only after the whole file decoded; a failure leaves
/// `series` untouched.
pub fn load_legacy_from_reader<R: Read + Seek + ?Sized>(
    r: &mut R,
    series: Option<&mut TimeSeries>,
) -> Result<Option<SimParams>> {
    let Some(series) = series else {
        return Ok(None);
    };

    let meta = read_metadata_v2(r)?;
    let table = read_offset_table(r, &meta)?;

    let [nx, ny, nz] = meta.grid.ref_lvl_0_cells;
    if nx.checked_mul(ny).and_then(|v| v.checked_mul(nz)) != Some(meta.total_cells()) {
        warn!(
            "legacy: total_cells={} differs from grid {}x{}x{}, centers may be wrong",
            meta.total_cells(),
            nx,
            ny,
            nz
        );
    }

    let cell_length = meta.grid.lvl_0_cell_length;
    let mut buf = vec![0u8; LEGACY_RECORD_SIZE];
    let mut decoded = Vec::with_capacity(table.len());
    for &(cell_id, offset) in &table {
        let center = cell_center(cell_id, &meta)?;
        read_at(r, offset, &mut buf)
            .with_context(|| format!("read record of cell {} at offset {}", cell_id, offset))?;
        decoded.push((cell_id, LegacySample::decode(&buf, center, cell_length)));
    }

    for (cell_id, sample) in decoded {
        series.append(cell_id, sample);
    }
    metrics::record_legacy_file(table.len() as u64);
    debug!("legacy: {} cell(s) appended", table.len());

    Ok(Some(meta.params))
}

/// (cell id, record offset) pairs following the v2 header.
pub fn read_offset_table<R: Read + Seek + ?Sized>(
    r: &mut R,
    meta: &SnapshotMetadata,
) -> Result<Vec<(u64, u64)>> {
    r.seek(SeekFrom::Start(meta.cell_list_start))?;
    ensure_remaining(r, meta.total_cells(), LEGACY_TABLE_ENTRY_SIZE)
        .context("read cell offset table")?;
    let n = meta.total_cells() as usize;
    let mut raw = vec![0u64; n * 2];
    r.read_u64_into::<LittleEndian>(&mut raw)
        .with_context(|| format!("read cell offset table ({} entries)", n))?;
    Ok(raw.chunks_exact(2).map(|p| (p[0], p[1])).collect())
}
