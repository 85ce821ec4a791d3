//! Centralized configuration and builder for mhdsnap.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - DecoderConfig::from_env() reads the MHDSNAP_* variables; the builder
//!   overrides individual fields on top.
//!
//! Tunables:
//! - mmap (MHDSNAP_MMAP): map snapshot files instead of reading them through a BufReader.
//! - read_buffer_bytes (MHDSNAP_READ_BUFFER): BufReader capacity for the buffered backing.
//! - cell_chunk (MHDSNAP_CELL_CHUNK): chunk size for cell-list reads in the CLI
//!   (0 = split the list in two halves).

use std::fmt;

/// Default BufReader capacity (64 KiB).
pub const DEFAULT_READ_BUFFER: usize = 64 * 1024;

/// Top-level configuration for snapshot readers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Memory-map snapshot files.
    /// Env: MHDSNAP_MMAP (default false; "1|true|on|yes" => true)
    pub mmap: bool,

    /// Capacity of the BufReader used when `mmap` is off (or the file is empty).
    /// Env: MHDSNAP_READ_BUFFER (default 65536, 0 is bumped to 1)
    pub read_buffer_bytes: usize,

    /// Cell ids per chunk when walking the cell list (0 = two halves).
    /// Env: MHDSNAP_CELL_CHUNK (default 0)
    pub cell_chunk: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            mmap: false,
            read_buffer_bytes: DEFAULT_READ_BUFFER,
            cell_chunk: 0,
        }
    }
}

fn env_flag(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

impl DecoderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("MHDSNAP_MMAP") {
            cfg.mmap = env_flag(&v);
        }

        if let Ok(v) = std::env::var("MHDSNAP_READ_BUFFER") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.read_buffer_bytes = n.max(1);
            }
        }

        if let Ok(v) = std::env::var("MHDSNAP_CELL_CHUNK") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.cell_chunk = n;
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_mmap(mut self, on: bool) -> Self {
        self.mmap = on;
        self
    }

    pub fn with_read_buffer_bytes(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(1);
        self
    }

    pub fn with_cell_chunk(mut self, n: usize) -> Self {
        self.cell_chunk = n;
        self
    }

    /// Chunk size to use for a list of `total` ids.
    pub fn chunk_for(&self, total: u64) -> usize {
        if self.cell_chunk == 0 {
            (total / 2).max(1) as usize
        } else {
            self.cell_chunk
        }
    }
}

impl fmt::Display for DecoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecoderConfig {{ mmap: {}, read_buffer_bytes: {}, cell_chunk: {} }}",
            self.mmap,
            self.read_buffer_bytes,
            if self.cell_chunk == 0 {
                "halves".to_string()
            } else {
                self.cell_chunk.to_string()
            },
        )
    }
}

/// Lightweight builder that produces a DecoderConfig.
#[derive(Clone, Debug)]
pub struct DecoderBuilder {
    cfg: DecoderConfig,
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: DecoderConfig::from_env(),
        }
    }
}

impl DecoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: DecoderConfig::default(),
        }
    }

    pub fn mmap(mut self, on: bool) -> Self {
        self.cfg.mmap = on;
        self
    }

    pub fn read_buffer_bytes(mut self, bytes: usize) -> Self {
        self.cfg.read_buffer_bytes = bytes.max(1);
        self
    }

    pub fn cell_chunk(mut self, n: usize) -> Self {
        self.cfg.cell_chunk = n;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> DecoderConfig {
        self.cfg
    }
}
