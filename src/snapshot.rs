//! snapshot: открытие файла снапшота как seekable потока (RAM/MMAP).
//!
//! [`SnapshotFile`] implements `Read + Seek`, so every reader in this crate
//! works on it unchanged. With `mmap` enabled the whole file is mapped from
//! offset 0 and reads are slice copies; otherwise a `BufReader<File>` is used.
//! Empty files are never mapped.

use anyhow::{anyhow, Context, Result};
use log::debug;
use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::config::DecoderConfig;
use crate::error::SnapError;
use crate::meta::{read_metadata, SnapshotMetadata};

enum Backing {
    Mapped(Cursor<Mmap>),
    Buffered(BufReader<File>),
}

/// Read-only handle on one snapshot file.
pub struct SnapshotFile {
    path: PathBuf,
    len: u64,
    backing: Backing,
}

impl SnapshotFile {
    /// Open with configuration taken from the environment.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, &DecoderConfig::from_env())
    }

    pub fn open_with_config(path: &Path, cfg: &DecoderConfig) -> Result<Self> {
        if !path.is_file() {
            return Err(SnapError::NotAFile {
                path: path.to_path_buf(),
            }
            .into());
        }
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("open snapshot {}", path.display()))?;
        let len = file.metadata()?.len();

        let backing = if cfg.mmap && len > 0 {
            // The file is opened read-only and never written through this handle.
            let mmap = unsafe { Mmap::map(&file) }
                .map_err(|e| anyhow!("mmap {}: {}", path.display(), e))?;
            Backing::Mapped(Cursor::new(mmap))
        } else {
            Backing::Buffered(BufReader::with_capacity(cfg.read_buffer_bytes.max(1), file))
        };
        debug!(
            "snapshot: opened {} ({} B, {})",
            path.display(),
            len,
            if matches!(backing, Backing::Mapped(_)) { "mmap" } else { "buffered" }
        );

        Ok(Self {
            path: path.to_path_buf(),
            len,
            backing,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at open time.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }

    /// Parse the header; the handle is left at the cell-list start.
    pub fn metadata(&mut self) -> Result<SnapshotMetadata> {
        let path = self.path.clone();
        read_metadata(self).with_context(|| format!("read header of {}", path.display()))
    }
}

impl Read for SnapshotFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.backing {
            Backing::Mapped(c) => c.read(buf),
            Backing::Buffered(b) => b.read(buf),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        match &mut self.backing {
            Backing::Mapped(c) => c.read_exact(buf),
            Backing::Buffered(b) => b.read_exact(buf),
        }
    }
}

impl Seek for SnapshotFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.backing {
            Backing::Mapped(c) => c.seek(pos),
            Backing::Buffered(b) => b.seek(pos),
        }
    }
}
