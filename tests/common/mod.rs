//! Test-only snapshot writer. The crate itself never writes snapshots; these
//! helpers lay out bytes exactly as the producer does so the readers can be
//! exercised end to end.
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{LittleEndian, WriteBytesExt};

use mhdsnap::consts::{ENDIANNESS_MARKER, GRID_HDR_SIZE, SIM_PARAMS_SIZE, VAR_NAME_LEN};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let root = std::env::temp_dir().join(format!("mhdsnap-{prefix}-{pid}-{t}-{id}"));
    fs::create_dir_all(&root).unwrap();
    root
}

pub fn write_file(root: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Grid header fields, defaults: 1x1x1 Cartesian unit grid at the origin.
#[derive(Clone, Debug)]
pub struct Grid {
    pub endianness: u64,
    pub dims: [u64; 3],
    pub max_ref_lvl: i32,
    pub neighborhood_length: u32,
    pub periodicity: [u8; 3],
    pub geometry_id: i32,
    pub start: [f64; 3],
    pub cell_length: [f64; 3],
    pub total_cells: u64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            endianness: ENDIANNESS_MARKER,
            dims: [1, 1, 1],
            max_ref_lvl: 0,
            neighborhood_length: 1,
            periodicity: [0, 0, 0],
            geometry_id: 1,
            start: [0.0; 3],
            cell_length: [1.0; 3],
            total_cells: 1,
        }
    }
}

impl Grid {
    fn write(&self, out: &mut Vec<u8>) {
        out.write_u64::<LittleEndian>(self.endianness).unwrap();
        for n in self.dims {
            out.write_u64::<LittleEndian>(n).unwrap();
        }
        out.write_i32::<LittleEndian>(self.max_ref_lvl).unwrap();
        out.write_u32::<LittleEndian>(self.neighborhood_length).unwrap();
        out.write_all(&self.periodicity).unwrap();
        out.write_i32::<LittleEndian>(self.geometry_id).unwrap();
        for x in self.start.iter().chain(self.cell_length.iter()) {
            out.write_f64::<LittleEndian>(*x).unwrap();
        }
        out.write_u64::<LittleEndian>(self.total_cells).unwrap();
    }
}

pub const PARAMS: [f64; 4] = [12.5, 5.0 / 3.0, 1.672_621_9e-27, 1.256_637_06e-6];

/// v3 file: header, cell-id list, then one block per variable.
#[derive(Clone, Debug, Default)]
pub struct V3File {
    pub sim_step: u64,
    pub grid: Grid,
    pub cell_ids: Vec<u64>,
    /// (name, per-cell data already laid out with the variable's stride)
    pub vars: Vec<(String, Vec<u8>)>,
}

impl V3File {
    pub fn new(cell_ids: Vec<u64>) -> Self {
        let n = cell_ids.len() as u64;
        Self {
            sim_step: 7,
            grid: Grid {
                dims: [n.max(1), 1, 1],
                total_cells: n,
                ..Grid::default()
            },
            cell_ids,
            vars: Vec::new(),
        }
    }

    pub fn var(mut self, name: &str, data: Vec<u8>) -> Self {
        self.vars.push((name.to_string(), data));
        self
    }

    pub fn header_len(&self) -> usize {
        8 + 8 + SIM_PARAMS_SIZE + 1 + 8 * self.vars.len() + GRID_HDR_SIZE
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let list_start = self.header_len();
        let mut offsets = Vec::new();
        let mut off = list_start + 8 * self.cell_ids.len();
        for (_, data) in &self.vars {
            offsets.push(off as u64);
            off += VAR_NAME_LEN + data.len();
        }

        let mut out = Vec::new();
        out.write_u64::<LittleEndian>(3).unwrap();
        out.write_u64::<LittleEndian>(self.sim_step).unwrap();
        for x in PARAMS {
            out.write_f64::<LittleEndian>(x).unwrap();
        }
        out.write_u8(self.vars.len() as u8).unwrap();
        for o in &offsets {
            out.write_u64::<LittleEndian>(*o).unwrap();
        }
        self.grid.write(&mut out);
        assert_eq!(out.len(), list_start);

        for id in &self.cell_ids {
            out.write_u64::<LittleEndian>(*id).unwrap();
        }
        for (name, data) in &self.vars {
            out.extend_from_slice(&name_tag(name));
            out.extend_from_slice(data);
        }
        out
    }
}

pub fn name_tag(name: &str) -> [u8; VAR_NAME_LEN] {
    assert!(name.len() <= VAR_NAME_LEN);
    let mut tag = [b' '; VAR_NAME_LEN];
    tag[..name.len()].copy_from_slice(name.as_bytes());
    tag
}

pub fn f64s(xs: &[f64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xs.len() * 8);
    for x in xs {
        out.write_f64::<LittleEndian>(*x).unwrap();
    }
    out
}

pub fn i32s(xs: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xs.len() * 4);
    for x in xs {
        out.write_i32::<LittleEndian>(*x).unwrap();
    }
    out
}

pub fn u32s(xs: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xs.len() * 4);
    for x in xs {
        out.write_u32::<LittleEndian>(*x).unwrap();
    }
    out
}

/// `mhd` block for the given (rho, mom, E, B) per cell.
pub fn mhd_block(cells: &[(f64, [f64; 3], f64, [f64; 3])]) -> Vec<u8> {
    let mut xs = Vec::new();
    for (rho, m, e, b) in cells {
        xs.push(*rho);
        xs.extend_from_slice(m);
        xs.push(*e);
        xs.extend_from_slice(b);
    }
    f64s(&xs)
}

/// The two-cell file used by several tests.
pub fn two_cell_mhd() -> V3File {
    V3File::new(vec![11, 42]).var(
        "mhd",
        mhd_block(&[
            (1.0, [0.0, 0.0, 0.0], 2.0, [0.0, 0.0, 1.0]),
            (3.0, [1.0, 0.0, 0.0], 4.0, [0.0, 0.0, -1.0]),
        ]),
    )
}

/// Legacy record values for one cell; `seed` makes every field distinct.
pub fn legacy_record(seed: f64, rank: i32) -> Vec<u8> {
    let mut out = Vec::new();
    let f = |k: f64| seed * 100.0 + k;
    out.extend(f64s(&[f(0.0)]));
    out.extend(f64s(&[f(1.0), f(2.0), f(3.0)]));
    out.extend(f64s(&[f(4.0)]));
    out.extend(f64s(&[f(5.0)]));
    out.extend(f64s(&[f(6.0), f(7.0), f(8.0)]));
    out.extend(f64s(&[f(9.0)]));
    out.extend(f64s(&[f(10.0), f(11.0), f(12.0)]));
    out.extend(i32s(&[rank]));
    out.extend(f64s(&[f(13.0)]));
    out.extend(f64s(&[f(14.0), f(15.0), f(16.0)]));
    out.extend(f64s(&[f(17.0), f(18.0), f(19.0)]));
    out.extend(f64s(&[f(20.0), f(21.0), f(22.0)]));
    out.extend(f64s(&[f(23.0), f(24.0), f(25.0)]));
    out
}

/// v2 file: header, (id, offset) table, records in table order.
#[derive(Clone, Debug)]
pub struct V2File {
    pub params: [f64; 4],
    pub grid: Grid,
    /// (cell id, record bytes)
    pub cells: Vec<(u64, Vec<u8>)>,
}

impl V2File {
    pub fn new(dims: [u64; 3], cells: Vec<(u64, Vec<u8>)>) -> Self {
        Self {
            params: PARAMS,
            grid: Grid {
                dims,
                total_cells: cells.len() as u64,
                ..Grid::default()
            },
            cells,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u64::<LittleEndian>(2).unwrap();
        for x in self.params {
            out.write_f64::<LittleEndian>(x).unwrap();
        }
        self.grid.write(&mut out);

        let mut off = (out.len() + 16 * self.cells.len()) as u64;
        for (id, rec) in &self.cells {
            out.write_u64::<LittleEndian>(*id).unwrap();
            out.write_u64::<LittleEndian>(off).unwrap();
            off += rec.len() as u64;
        }
        for (_, rec) in &self.cells {
            out.extend_from_slice(rec);
        }
        out
    }
}
