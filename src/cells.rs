//! Cell-id list of a v3 snapshot.
//!
//! The list is `total_cells` LE `u64` ids starting at `cell_list_start`.
//! [`read_cell_ids`] reads from wherever the stream currently is, so two
//! consecutive calls continue one another. [`CellListCursor`] keeps its own
//! position and re-seeks before each chunk, which lets callers decode records
//! (moving the stream elsewhere) between chunks.

use anyhow::{Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::consts::CELL_ID_SIZE;
use crate::meta::SnapshotMetadata;
use crate::metrics;
use crate::util::ensure_remaining;

/// Read `count` cell ids from the current stream position.
///
/// A `count` reaching past the end of the stream fails with `Truncated`
/// before anything is allocated.
pub fn read_cell_ids<R: Read + Seek + ?Sized>(r: &mut R, count: usize) -> Result<Vec<u64>> {
    ensure_remaining(r, count as u64, CELL_ID_SIZE)?;
    let mut ids = vec![0u64; count];
    r.read_u64_into::<LittleEndian>(&mut ids)
        .with_context(|| format!("read {} cell id(s)", count))?;
    metrics::record_cell_ids(count);
    Ok(ids)
}

/// Resumable reader over the cell-id list.
#[derive(Debug, Clone)]
pub struct CellListCursor {
    next_offset: u64,
    /// Positional index of the next id to be returned.
    position: u64,
    total: u64,
}

impl CellListCursor {
    pub fn new(meta: &SnapshotMetadata) -> Self {
        Self {
            next_offset: meta.cell_list_start,
            position: 0,
            total: meta.total_cells(),
        }
    }

    /// Positional index of the next id `next_chunk` will return.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.total - self.position
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.total
    }

    /// Read at most `max` ids; returns an empty vec once the list is exhausted.
    pub fn next_chunk<R: Read + Seek + ?Sized>(&mut self, r: &mut R, max: usize) -> Result<Vec<u64>> {
        let count = (max as u64).min(self.remaining()) as usize;
        if count == 0 {
            return Ok(Vec::new());
        }
        r.seek(SeekFrom::Start(self.next_offset))?;
        let ids = read_cell_ids(r, count)?;
        self.next_offset += (count * CELL_ID_SIZE) as u64;
        self.position += count as u64;
        Ok(ids)
    }

    /// Read everything that is left.
    pub fn read_rest<R: Read + Seek + ?Sized>(&mut self, r: &mut R) -> Result<Vec<u64>> {
        let rest = self.remaining() as usize;
        self.next_chunk(r, rest)
    }
}
