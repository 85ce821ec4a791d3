use anyhow::Result;
use serde_json::json;
use std::io::{Seek, SeekFrom};
use std::path::Path;

use mhdsnap::{read_cell_data, read_cell_ids, read_cell_records, DecoderConfig, SnapshotFile};

use crate::util::print_record;

pub fn exec(
    path: &Path,
    vars: &[String],
    indices: &[u64],
    json: bool,
    cfg: &DecoderConfig,
) -> Result<()> {
    let mut f = SnapshotFile::open_with_config(path, cfg)?;
    let meta = f.metadata()?;

    let indices: Vec<u64> = if indices.is_empty() { vec![0] } else { indices.to_vec() };
    let records = if vars.is_empty() {
        read_cell_data(&mut f, &meta, indices.iter().copied())?
    } else {
        let names: Vec<&str> = vars.iter().map(String::as_str).collect();
        read_cell_records(&mut f, &meta, &names, indices.iter().copied())?
    };

    // ids for display
    f.seek(SeekFrom::Start(meta.cell_list_start))?;
    let ids = read_cell_ids(&mut f, meta.total_cells() as usize)?;

    for rec in &records {
        let id = ids[rec.index as usize];
        if json {
            println!("{}", serde_json::to_string(&json!({ "cell": id, "record": rec }))?);
        } else {
            print_record(id, rec);
        }
    }
    Ok(())
}
