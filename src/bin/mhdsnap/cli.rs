use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Диагностический CLI для снапшотов MHD (v2/v3)
#[derive(Parser, Debug)]
#[command(
    name = "mhdsnap",
    version,
    about = "Inspect MHD simulation snapshot files (v2 legacy / v3 variable directory)",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print decode counters (JSON) after the command finishes
    #[arg(long, global = true)]
    pub stats: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print metadata of each file and walk its cell list in chunks,
    /// decoding the first cell of every chunk
    Dump {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// One JSON object per file
        #[arg(long)]
        json: bool,
        /// Cell ids per chunk (overrides MHDSNAP_CELL_CHUNK; 0 = two halves)
        #[arg(long)]
        chunk: Option<usize>,
    },
    /// Decode chosen variables at chosen positional indices (v3)
    Records {
        #[arg(long)]
        path: PathBuf,
        /// Variable name, repeatable (e.g. --var mhd --var "mhd info").
        /// Without --var every directory variable is decoded.
        #[arg(long = "var")]
        vars: Vec<String>,
        /// Positional index in the cell list, repeatable (default: 0)
        #[arg(long = "index")]
        indices: Vec<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Load v2 files in the given order into one per-cell time series
    Legacy {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the center of level-0 cells by id
    Center {
        #[arg(long)]
        path: PathBuf,
        #[arg(long = "cell", required = true)]
        cells: Vec<u64>,
    },
}
