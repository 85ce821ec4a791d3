// src/meta.rs: snapshot header (v2 legacy / v3 variable directory)
//
// Формат заголовка (LE, без выравнивания):
//
// v3:
//   u64 file_version = 3
//   u64 sim_step
//   f64 sim_time, f64 adiabatic_index, f64 proton_mass, f64 vacuum_permeability
//   u8  nr_variables
//   u64 var_offset[nr_variables]      -- absolute; each points at [name 8B][data...]
//   <grid header>
//   [cell list: u64 cell_id * total_cells]
//
// v2:
//   u64 file_version = 2
//   f64 sim_time, f64 adiabatic_index, f64 proton_mass, f64 vacuum_permeability
//   <grid header>
//   [(u64 cell_id, u64 record_offset) * total_cells]
//
// grid header:
//   u64 endianness = 0x1234567890abcdef
//   u64 ref_lvl_0_cells[3]
//   i32 max_ref_lvl (must be 0)
//   u32 neighborhood_length
//   u8  periodicity[3]
//   i32 geometry_id (must be 1, Cartesian)
//   f64 grid_start[3]
//   f64 lvl_0_cell_length[3]
//   u64 total_cells
//
// Политика:
// - Every check fires right after its field is read; nothing past a failed
//   check is read.
// - On success the stream is left at `cell_list_start`.

use anyhow::{Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

use crate::consts::{
    ENDIANNESS_MARKER, FILE_VERSION_V2, FILE_VERSION_V3, GEOMETRY_CARTESIAN, VAR_NAME_LEN,
};
use crate::error::SnapError;
use crate::metrics;
use crate::util::{read_at, trim_name_tag};

/// Physical constants and clock of the run, common to both versions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimParams {
    pub sim_time: f64,
    pub adiabatic_index: f64,
    pub proton_mass: f64,
    pub vacuum_permeability: f64,
}

/// Grid description shared by both versions, starting at the endianness marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridHeader {
    pub endianness: u64,
    /// Cells along each axis at refinement level 0.
    pub ref_lvl_0_cells: [u64; 3],
    pub max_ref_lvl: i32,
    pub neighborhood_length: u32,
    pub periodicity: [bool; 3],
    pub geometry_id: i32,
    pub grid_start: [f64; 3],
    pub lvl_0_cell_length: [f64; 3],
    pub total_cells: u64,
}

/// One named field of a v3 file: where its per-cell array begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarDescriptor {
    pub name: String,
    pub data_start: u64,
}

/// Variable directory of a v3 file, in file order. Empty for v2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VarDirectory {
    entries: Vec<VarDescriptor>,
}

impl VarDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; names must be unique.
    pub fn insert(&mut self, name: String, data_start: u64) -> Result<()> {
        if self.get(&name).is_some() {
            return Err(SnapError::DuplicateVariable { name }.into());
        }
        self.entries.push(VarDescriptor { name, data_start });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VarDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VarDescriptor> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the header says about one snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotMetadata {
    pub file_version: u64,
    /// Only v3 files record the step counter.
    pub sim_step: Option<u64>,
    pub params: SimParams,
    pub grid: GridHeader,
    /// v3: start of the cell-id list. v2: start of the (cell id, offset) table.
    pub cell_list_start: u64,
    pub variables: VarDirectory,
}

impl SnapshotMetadata {
    #[inline]
    pub fn total_cells(&self) -> u64 {
        self.grid.total_cells
    }

    #[inline]
    pub fn is_legacy(&self) -> bool {
        self.file_version == FILE_VERSION_V2
    }
}

// ---- Чтение ----

/// Read the header of a v2 or v3 file. The stream is rewound to 0 first and
/// left at `cell_list_start` on success.
pub fn read_metadata<R: Read + Seek + ?Sized>(r: &mut R) -> Result<SnapshotMetadata> {
    r.seek(SeekFrom::Start(0))?;
    let version = r.read_u64::<LittleEndian>().context("read file version")?;
    match version {
        FILE_VERSION_V3 => read_v3_body(r),
        FILE_VERSION_V2 => read_v2_body(r),
        found => Err(SnapError::FormatVersion { found }.into()),
    }
}

/// Like [`read_metadata`] but only accepts the current (v3) format.
pub fn read_metadata_v3<R: Read + Seek + ?Sized>(r: &mut R) -> Result<SnapshotMetadata> {
    r.seek(SeekFrom::Start(0))?;
    let version = r.read_u64::<LittleEndian>().context("read file version")?;
    if version != FILE_VERSION_V3 {
        return Err(SnapError::FormatVersion { found: version }.into());
    }
    read_v3_body(r)
}

/// Like [`read_metadata`] but only accepts the legacy (v2) format.
pub fn read_metadata_v2<R: Read + Seek + ?Sized>(r: &mut R) -> Result<SnapshotMetadata> {
    r.seek(SeekFrom::Start(0))?;
    let version = r.read_u64::<LittleEndian>().context("read file version")?;
    if version != FILE_VERSION_V2 {
        return Err(SnapError::FormatVersion { found: version }.into());
    }
    read_v2_body(r)
}

fn read_v3_body<R: Read + Seek + ?Sized>(r: &mut R) -> Result<SnapshotMetadata> {
    let sim_step = r.read_u64::<LittleEndian>().context("read sim step")?;
    let params = read_sim_params(r)?;

    let nr_variables = r.read_u8().context("read variable count")?;
    let mut var_offsets = Vec::with_capacity(nr_variables as usize);
    for _ in 0..nr_variables {
        var_offsets.push(r.read_u64::<LittleEndian>().context("read variable offset")?);
    }

    let grid = read_grid_header(r)?;
    let cell_list_start = r.stream_position()?;

    let mut variables = VarDirectory::new();
    let mut tag = [0u8; VAR_NAME_LEN];
    for offset in var_offsets {
        read_at(r, offset, &mut tag)
            .with_context(|| format!("read variable name at offset {}", offset))?;
        let name = trim_name_tag(&tag);
        let data_start = offset + VAR_NAME_LEN as u64;
        debug!("meta: variable {:?} data_start={}", name, data_start);
        variables.insert(name, data_start)?;
    }
    r.seek(SeekFrom::Start(cell_list_start))?;

    metrics::record_header_parsed();
    debug!(
        "meta: v3 step={} cells={} vars={} cell_list_start={}",
        sim_step,
        grid.total_cells,
        variables.len(),
        cell_list_start
    );

    Ok(SnapshotMetadata {
        file_version: FILE_VERSION_V3,
        sim_step: Some(sim_step),
        params,
        grid,
        cell_list_start,
        variables,
    })
}

fn read_v2_body<R: Read + Seek + ?Sized>(r: &mut R) -> Result<SnapshotMetadata> {
    let params = read_sim_params(r)?;
    let grid = read_grid_header(r)?;
    let cell_list_start = r.stream_position()?;

    metrics::record_header_parsed();
    debug!(
        "meta: v2 cells={} table_start={}",
        grid.total_cells, cell_list_start
    );

    Ok(SnapshotMetadata {
        file_version: FILE_VERSION_V2,
        sim_step: None,
        params,
        grid,
        cell_list_start,
        variables: VarDirectory::new(),
    })
}

fn read_sim_params<R: Read + ?Sized>(r: &mut R) -> Result<SimParams> {
    let mut v = [0.0f64; 4];
    r.read_f64_into::<LittleEndian>(&mut v)
        .context("read simulation parameters")?;
    Ok(SimParams {
        sim_time: v[0],
        adiabatic_index: v[1],
        proton_mass: v[2],
        vacuum_permeability: v[3],
    })
}

/// Grid header, validated field by field.
pub fn read_grid_header<R: Read + ?Sized>(r: &mut R) -> Result<GridHeader> {
    let endianness = r.read_u64::<LittleEndian>().context("read endianness")?;
    if endianness != ENDIANNESS_MARKER {
        return Err(SnapError::Endianness { found: endianness }.into());
    }

    let mut ref_lvl_0_cells = [0u64; 3];
    r.read_u64_into::<LittleEndian>(&mut ref_lvl_0_cells)?;

    let max_ref_lvl = r.read_i32::<LittleEndian>()?;
    if max_ref_lvl != 0 {
        return Err(SnapError::RefinementUnsupported { found: max_ref_lvl }.into());
    }

    let neighborhood_length = r.read_u32::<LittleEndian>()?;

    let mut periodic_raw = [0u8; 3];
    r.read_exact(&mut periodic_raw)?;
    let periodicity = periodic_raw.map(|b| b != 0);

    let geometry_id = r.read_i32::<LittleEndian>()?;
    if geometry_id != GEOMETRY_CARTESIAN {
        return Err(SnapError::GeometryUnsupported { found: geometry_id }.into());
    }

    let mut grid_start = [0.0f64; 3];
    r.read_f64_into::<LittleEndian>(&mut grid_start)?;
    let mut lvl_0_cell_length = [0.0f64; 3];
    r.read_f64_into::<LittleEndian>(&mut lvl_0_cell_length)?;
    let total_cells = r.read_u64::<LittleEndian>()?;

    Ok(GridHeader {
        endianness,
        ref_lvl_0_cells,
        max_ref_lvl,
        neighborhood_length,
        periodicity,
        geometry_id,
        grid_start,
        lvl_0_cell_length,
        total_cells,
    })
}
