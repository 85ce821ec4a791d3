//! Lightweight global metrics for mhdsnap.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Header / variable directory
//! - Cell list
//! - Cell records (v3)
//! - Legacy loader (v2)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Header -----
static HEADERS_PARSED: AtomicU64 = AtomicU64::new(0);

// ----- Cell list -----
static CELL_IDS_READ: AtomicU64 = AtomicU64::new(0);
static CELL_LIST_CHUNKS: AtomicU64 = AtomicU64::new(0);

// ----- Records (v3) -----
static RECORDS_DECODED: AtomicU64 = AtomicU64::new(0);
static RECORD_BYTES_READ: AtomicU64 = AtomicU64::new(0);
static VARIABLES_SKIPPED: AtomicU64 = AtomicU64::new(0);

// ----- Legacy (v2) -----
static LEGACY_FILES_LOADED: AtomicU64 = AtomicU64::new(0);
static LEGACY_CELLS_LOADED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub headers_parsed: u64,

    pub cell_ids_read: u64,
    pub cell_list_chunks: u64,

    pub records_decoded: u64,
    pub record_bytes_read: u64,
    pub variables_skipped: u64,

    pub legacy_files_loaded: u64,
    pub legacy_cells_loaded: u64,
}

impl MetricsSnapshot {
    pub fn avg_record_bytes(&self) -> f64 {
        if self.records_decoded == 0 {
            0.0
        } else {
            self.record_bytes_read as f64 / self.records_decoded as f64
        }
    }
}

// ----- Recorders -----
pub fn record_header_parsed() {
    HEADERS_PARSED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_cell_ids(count: usize) {
    CELL_IDS_READ.fetch_add(count as u64, Ordering::Relaxed);
    CELL_LIST_CHUNKS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_decoded(bytes: usize) {
    RECORDS_DECODED.fetch_add(1, Ordering::Relaxed);
    RECORD_BYTES_READ.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_variable_skipped() {
    VARIABLES_SKIPPED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_legacy_file(cells: u64) {
    LEGACY_FILES_LOADED.fetch_add(1, Ordering::Relaxed);
    LEGACY_CELLS_LOADED.fetch_add(cells, Ordering::Relaxed);
}

// ----- Snapshot -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        headers_parsed: HEADERS_PARSED.load(Ordering::Relaxed),

        cell_ids_read: CELL_IDS_READ.load(Ordering::Relaxed),
        cell_list_chunks: CELL_LIST_CHUNKS.load(Ordering::Relaxed),

        records_decoded: RECORDS_DECODED.load(Ordering::Relaxed),
        record_bytes_read: RECORD_BYTES_READ.load(Ordering::Relaxed),
        variables_skipped: VARIABLES_SKIPPED.load(Ordering::Relaxed),

        legacy_files_loaded: LEGACY_FILES_LOADED.load(Ordering::Relaxed),
        legacy_cells_loaded: LEGACY_CELLS_LOADED.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avg_record_bytes_handles_zero() {
        let s = MetricsSnapshot::default();
        assert_eq!(s.avg_record_bytes(), 0.0);
        let s = MetricsSnapshot {
            records_decoded: 4,
            record_bytes_read: 256,
            ..Default::default()
        };
        assert_eq!(s.avg_record_bytes(), 64.0);
    }
}
