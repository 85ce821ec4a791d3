//! Typed failure kinds for snapshot decoding.
//!
//! Library functions return `anyhow::Result`; whenever a structural check fails,
//! the root cause is a [`SnapError`]. Callers that need to tell the kinds apart
//! use [`SnapError::of`] (or `err.downcast_ref::<SnapError>()` directly), which
//! also looks through any `.context(..)` layers added on the way up.

use std::fmt;
use std::path::PathBuf;

/// Structural violations found while decoding a snapshot. All are fatal for
/// the file being decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapError {
    /// The leading version tag is not one this reader understands
    /// (or not the one the entry point expects).
    FormatVersion { found: u64 },
    /// The endianness marker does not match `ENDIANNESS_MARKER`.
    Endianness { found: u64 },
    /// Geometry id other than Cartesian.
    GeometryUnsupported { found: i32 },
    /// Nonzero maximum refinement level.
    RefinementUnsupported { found: i32 },
    /// Variable name outside the closed catalog.
    UnknownVariable { name: String },
    /// The same variable name appears twice in one directory.
    DuplicateVariable { name: String },
    /// The given path does not reference a readable regular file.
    NotAFile { path: PathBuf },
    /// Positional index past the end of the cell list.
    IndexOutOfRange { index: u64, total: u64 },
    /// Cell ids are 1-based; zero has no position in the grid.
    InvalidCellId { cell_id: u64 },
    /// Grid with a zero-length axis cannot map cell ids to positions.
    InvalidGrid { dims: [u64; 3] },
    /// A table or list sized by the header runs past the end of the stream.
    Truncated { needed: u64, available: u64 },
}

impl SnapError {
    /// Find the `SnapError` at the root of an `anyhow` chain, if there is one.
    pub fn of(err: &anyhow::Error) -> Option<&SnapError> {
        err.downcast_ref::<SnapError>()
    }
}

impl fmt::Display for SnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormatVersion { found } => write!(f, "unsupported file version {found}"),
            Self::Endianness { found } => write!(
                f,
                "unsupported endianness: expected {:#018x}, got {found:#018x}",
                crate::consts::ENDIANNESS_MARKER
            ),
            Self::GeometryUnsupported { found } => {
                write!(f, "unsupported geometry id {found} (only Cartesian = 1)")
            }
            Self::RefinementUnsupported { found } => {
                write!(f, "refinement level {found} not supported (must be 0)")
            }
            Self::UnknownVariable { name } => write!(f, "unsupported variable {name:?}"),
            Self::DuplicateVariable { name } => {
                write!(f, "variable {name:?} listed twice in directory")
            }
            Self::NotAFile { path } => {
                write!(f, "given file name ({}) is not a file", path.display())
            }
            Self::IndexOutOfRange { index, total } => {
                write!(f, "cell index {index} out of range 0..{total}")
            }
            Self::InvalidCellId { cell_id } => write!(f, "invalid cell id {cell_id} (ids are 1-based)"),
            Self::InvalidGrid { dims } => write!(
                f,
                "invalid grid dimensions {}x{}x{}",
                dims[0], dims[1], dims[2]
            ),
            Self::Truncated { needed, available } => write!(
                f,
                "header announces {needed} B of table data, only {available} B left in stream"
            ),
        }
    }
}

impl std::error::Error for SnapError {}
