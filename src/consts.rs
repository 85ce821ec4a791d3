//! Общие константы формата снапшотов (header, variable directory, legacy records).

// -------- Header --------
pub const FILE_VERSION_V2: u64 = 2;
pub const FILE_VERSION_V3: u64 = 3;

/// Written by the producer in its native byte order; reading it back
/// verbatim proves both sides agree on endianness.
pub const ENDIANNESS_MARKER: u64 = 0x1234_5678_90ab_cdef;

/// Geometry id of a plain Cartesian grid.
pub const GEOMETRY_CARTESIAN: i32 = 1;

// Grid header (shared by v2 and v3), starting at the endianness marker:
// [endianness u64][ref_lvl_0_cells 3*u64][max_ref_lvl i32][neighborhood_length u32]
// [periodicity 3*u8][geometry_id i32][grid_start 3*f64][lvl_0_cell_length 3*f64][total_cells u64]
pub const GRID_HDR_SIZE: usize = 8 + 24 + 4 + 4 + 3 + 4 + 24 + 24 + 8;

// Simulation parameters: [sim_time f64][adiabatic_index f64][proton_mass f64][vacuum_permeability f64]
pub const SIM_PARAMS_SIZE: usize = 4 * 8;

// -------- Variable directory (v3) --------
// Each directory offset points at [name 8 bytes ASCII, space/NUL padded][data ...]
pub const VAR_NAME_LEN: usize = 8;

// -------- Cell list --------
pub const CELL_ID_SIZE: usize = 8;
// v2 table entry: [cell_id u64][record_offset u64]
pub const LEGACY_TABLE_ENTRY_SIZE: usize = 16;

// -------- Legacy monolithic record (v2) --------
// [rho1 f64][mom1 3*f64][E1 f64][rho2 f64][mom2 3*f64][E2 f64][J 3*f64][rank i32]
// [resistivity f64][B 3*f64][bgB+x 3*f64][bgB+y 3*f64][bgB+z 3*f64]
pub const LEGACY_RECORD_SIZE: usize = 8 + 24 + 8 + 8 + 24 + 8 + 24 + 4 + 8 + 24 + 3 * 24;
