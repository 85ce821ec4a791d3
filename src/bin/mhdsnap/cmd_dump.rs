use anyhow::{anyhow, Result};
use log::info;
use serde_json::json;
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use mhdsnap::legacy::read_offset_table;
use mhdsnap::{read_cell_data, read_cell_ids, CellListCursor, DecoderConfig, SnapshotFile};

use crate::util::{print_metadata, print_record};

/// Metadata + chunked walk over the cell list.
///
/// The list is read chunk by chunk through a cursor, the first cell of each
/// chunk is decoded in between (which moves the stream), and the concatenated
/// chunks are then compared with a single full read.
pub fn exec(files: &[PathBuf], json: bool, cfg: &DecoderConfig) -> Result<()> {
    for path in files {
        let mut f = SnapshotFile::open_with_config(path, cfg)?;
        let meta = f.metadata()?;

        if meta.is_legacy() {
            let table = read_offset_table(&mut f, &meta)?;
            if json {
                let out = json!({
                    "file": path.display().to_string(),
                    "metadata": &meta,
                    "first_entry": table.first(),
                });
                println!("{}", serde_json::to_string(&out)?);
            } else {
                println!("== {}", path.display());
                print_metadata(&meta);
                if let Some((id, off)) = table.first() {
                    println!("first cell: id={} record_offset={}", id, off);
                }
            }
            continue;
        }

        let chunk = cfg.chunk_for(meta.total_cells());
        let mut cursor = CellListCursor::new(&meta);
        let mut chunked = Vec::new();
        let mut firsts = Vec::new();
        while !cursor.is_done() {
            let start = cursor.position();
            let ids = cursor.next_chunk(&mut f, chunk)?;
            let rec = read_cell_data(&mut f, &meta, [start])?;
            if let (Some(&id), Some(rec)) = (ids.first(), rec.into_iter().next()) {
                firsts.push((id, rec));
            }
            chunked.extend(ids);
        }

        f.seek(SeekFrom::Start(meta.cell_list_start))?;
        let full = read_cell_ids(&mut f, meta.total_cells() as usize)?;
        if full != chunked {
            return Err(anyhow!(
                "{}: chunked cell list ({} ids) differs from a single read ({} ids)",
                path.display(),
                chunked.len(),
                full.len()
            ));
        }
        info!(
            "{}: {} chunk(s) of <= {} ids consistent with full read",
            path.display(),
            firsts.len(),
            chunk
        );

        if json {
            let cells: Vec<_> = firsts
                .iter()
                .map(|(id, rec)| json!({ "cell": id, "record": rec }))
                .collect();
            let out = json!({
                "file": path.display().to_string(),
                "metadata": &meta,
                "chunk": chunk,
                "chunk_firsts": cells,
                "consistent": true,
            });
            println!("{}", serde_json::to_string(&out)?);
        } else {
            println!("== {}", path.display());
            print_metadata(&meta);
            for (id, rec) in &firsts {
                print_record(*id, rec);
            }
        }
    }
    Ok(())
}
