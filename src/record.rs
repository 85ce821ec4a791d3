//! Per-cell record decoding for v3 snapshots.
//!
//! Offset of variable `v` for the cell at positional index `i`:
//!
//! ```text
//! data_start[v] + i * stride[v]
//! ```
//!
//! Every lookup seeks to that absolute offset, so results never depend on the
//! order in which variables or indices are requested.

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Serialize;
use std::io::{Read, Seek};

use crate::catalog::{VarKind, VarValue};
use crate::consts::FILE_VERSION_V3;
use crate::error::SnapError;
use crate::meta::SnapshotMetadata;
use crate::metrics;
use crate::util::read_at;

/// Decoded variables of one cell, in request (or directory) order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRecord {
    /// Position in the cell-id list, not the cell id.
    pub index: u64,
    pub values: Vec<(VarKind, VarValue)>,
}

impl CellRecord {
    pub fn get(&self, kind: VarKind) -> Option<&VarValue> {
        self.values.iter().find(|(k, _)| *k == kind).map(|(_, v)| v)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&VarValue> {
        self.values
            .iter()
            .find(|(k, _)| k.name() == name)
            .map(|(_, v)| v)
    }
}

/// A variable resolved against one file: what to decode and where its array starts.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    kind: VarKind,
    data_start: u64,
}

/// Decode a single variable of the cell at `index`.
pub fn decode_variable<R: Read + Seek + ?Sized>(
    r: &mut R,
    kind: VarKind,
    data_start: u64,
    index: u64,
) -> Result<Option<VarValue>> {
    let Some(stride) = kind.stride() else {
        return Ok(None);
    };
    let offset = index
        .checked_mul(stride as u64)
        .and_then(|rel| rel.checked_add(data_start))
        .ok_or_else(|| anyhow!("offset of {} for cell #{} overflows u64", kind, index))?;
    let mut buf = vec![0u8; stride];
    read_at(r, offset, &mut buf)
        .with_context(|| format!("read {} of cell #{} at offset {}", kind, index, offset))?;
    metrics::record_decoded(stride);
    Ok(kind.decode(&buf))
}

/// Decode the named variables for each positional index.
///
/// Names outside the catalog fail with `UnknownVariable` before anything is
/// read. `"fluxes"` and catalog names missing from this file's directory are
/// skipped.
pub fn read_cell_records<R, I>(
    r: &mut R,
    meta: &SnapshotMetadata,
    names: &[&str],
    indices: I,
) -> Result<Vec<CellRecord>>
where
    R: Read + Seek + ?Sized,
    I: IntoIterator<Item = u64>,
{
    ensure_v3(meta)?;
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let kind = VarKind::from_name(name)?;
        match meta.variables.get(name) {
            Some(desc) => push_resolved(&mut resolved, kind, desc.data_start),
            None => {
                debug!("record: variable {:?} not in directory, skipped", name);
                metrics::record_variable_skipped();
            }
        }
    }
    decode_indices(r, meta, &resolved, indices)
}

/// Decode every variable listed in the file's directory, in directory order.
///
/// A directory entry outside the catalog fails with `UnknownVariable`.
pub fn read_cell_data<R, I>(r: &mut R, meta: &SnapshotMetadata, indices: I) -> Result<Vec<CellRecord>>
where
    R: Read + Seek + ?Sized,
    I: IntoIterator<Item = u64>,
{
    ensure_v3(meta)?;
    let mut resolved = Vec::with_capacity(meta.variables.len());
    for desc in meta.variables.iter() {
        let kind = VarKind::from_name(&desc.name)?;
        push_resolved(&mut resolved, kind, desc.data_start);
    }
    decode_indices(r, meta, &resolved, indices)
}

fn push_resolved(out: &mut Vec<Resolved>, kind: VarKind, data_start: u64) {
    if kind.is_decodable() {
        out.push(Resolved { kind, data_start });
    } else {
        metrics::record_variable_skipped();
    }
}

fn decode_indices<R, I>(
    r: &mut R,
    meta: &SnapshotMetadata,
    resolved: &[Resolved],
    indices: I,
) -> Result<Vec<CellRecord>>
where
    R: Read + Seek + ?Sized,
    I: IntoIterator<Item = u64>,
{
    let total = meta.total_cells();
    let mut out = Vec::new();
    for index in indices {
        if index >= total {
            return Err(SnapError::IndexOutOfRange { index, total }.into());
        }
        let mut values = Vec::with_capacity(resolved.len());
        for var in resolved {
            if let Some(v) = decode_variable(r, var.kind, var.data_start, index)? {
                values.push((var.kind, v));
            }
        }
        out.push(CellRecord { index, values });
    }
    Ok(out)
}

fn ensure_v3(meta: &SnapshotMetadata) -> Result<()> {
    if meta.file_version != FILE_VERSION_V3 {
        return Err(SnapError::FormatVersion {
            found: meta.file_version,
        })
        .context("cell records need a v3 variable directory");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Cursor;

    #[test]
    fn decode_variable_uses_stride_offsets() {
        // 16 bytes of junk, then a rank array [5, 6, 7]
        let mut bytes = vec![0xEEu8; 16];
        for r in [5i32, 6, 7] {
            bytes.write_i32::<LittleEndian>(r).unwrap();
        }
        let mut c = Cursor::new(bytes);
        assert_eq!(
            decode_variable(&mut c, VarKind::Rank, 16, 2).unwrap(),
            Some(VarValue::Rank(7))
        );
        assert_eq!(
            decode_variable(&mut c, VarKind::Rank, 16, 0).unwrap(),
            Some(VarValue::Rank(5))
        );
        assert_eq!(decode_variable(&mut c, VarKind::Fluxes, 16, 0).unwrap(), None);
        assert!(decode_variable(&mut c, VarKind::Rank, 16, 3).is_err());
    }

    #[test]
    fn huge_index_is_an_error_not_an_overflow() {
        let mut c = Cursor::new(vec![0u8; 64]);
        let err = decode_variable(&mut c, VarKind::Mhd, 16, 1 << 60).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err:#}");
        assert!(decode_variable(&mut c, VarKind::Rank, u64::MAX, 1).is_err());
    }

    #[test]
    fn record_lookup_by_kind_and_name() {
        let rec = CellRecord {
            index: 0,
            values: vec![
                (VarKind::Rank, VarValue::Rank(1)),
                (VarKind::MhdInfo, VarValue::MhdInfo(9)),
            ],
        };
        assert_eq!(rec.get(VarKind::MhdInfo), Some(&VarValue::MhdInfo(9)));
        assert_eq!(rec.get_by_name("rank"), Some(&VarValue::Rank(1)));
        assert!(rec.get(VarKind::Mhd).is_none());
    }
}
