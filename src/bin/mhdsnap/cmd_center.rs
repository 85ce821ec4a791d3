use anyhow::Result;
use log::warn;
use std::path::Path;

use mhdsnap::{cell_center, DecoderConfig, SnapshotFile};

use crate::util::fmt_vec;

pub fn exec(path: &Path, cells: &[u64], cfg: &DecoderConfig) -> Result<()> {
    let mut f = SnapshotFile::open_with_config(path, cfg)?;
    let meta = f.metadata()?;
    if !meta.is_legacy() {
        // v3 ids carry no position; the formula still applies to an unrefined grid
        warn!("{}: v3 file, centers assume id = linear index + 1", path.display());
    }
    for &id in cells {
        println!("{} {}", id, fmt_vec(&cell_center(id, &meta)?));
    }
    Ok(())
}
