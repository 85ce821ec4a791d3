// Базовые модули формата
pub mod consts;
pub mod error;
pub mod meta;
pub mod catalog;

// Чтение данных ячеек
pub mod cells;   // cell-id list (v3), resumable cursor
pub mod record;  // per-variable records (v3)
pub mod geometry; // cell centers from linear ids
pub mod legacy;  // monolithic v2 loader + TimeSeries

// Открытие файлов (RAM/MMAP)
pub mod snapshot;

pub mod config;
pub mod metrics;

// Утилиты (read_at, trim_name_tag, ...)
pub mod util;   // src/util/mod.rs

// Удобные реэкспорты
pub use catalog::{MhdState, VarKind, VarValue};
pub use cells::{read_cell_ids, CellListCursor};
pub use config::{DecoderBuilder, DecoderConfig};
pub use error::SnapError;
pub use geometry::{cell_center, cell_index};
pub use legacy::{load_legacy_from_reader, load_legacy_snapshot, LegacySample, TimeSeries};
pub use meta::{
    read_metadata, read_metadata_v2, read_metadata_v3, GridHeader, SimParams, SnapshotMetadata,
    VarDescriptor, VarDirectory,
};
pub use record::{decode_variable, read_cell_data, read_cell_records, CellRecord};
pub use snapshot::SnapshotFile;
