use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use mhdsnap::legacy::load_legacy_snapshot_with_config;
use mhdsnap::{DecoderConfig, TimeSeries};

use crate::util::fmt_vec;

/// Load every file into one time series, in the order given.
pub fn exec(files: &[PathBuf], json: bool, cfg: &DecoderConfig) -> Result<()> {
    let mut series = TimeSeries::new();
    let mut params = Vec::with_capacity(files.len());
    for path in files {
        if let Some(p) = load_legacy_snapshot_with_config(path, Some(&mut series), cfg)? {
            params.push((path.display().to_string(), p));
        }
    }

    if json {
        let files: Vec<_> = params
            .iter()
            .map(|(file, p)| json!({ "file": file, "params": p }))
            .collect();
        let out = json!({ "files": files, "cells": &series });
        println!("{}", serde_json::to_string(&out)?);
        return Ok(());
    }

    for (file, p) in &params {
        println!(
            "{}: sim_time={:e} adiabatic_index={} proton_mass={:e} vacuum_permeability={:e}",
            file, p.sim_time, p.adiabatic_index, p.proton_mass, p.vacuum_permeability
        );
    }
    println!(
        "cells: {}, samples: {}",
        series.len(),
        series.samples_total()
    );
    for (cell_id, samples) in series.iter() {
        if let Some(last) = samples.last() {
            println!(
                "cell {}: {} sample(s), center={} B={}",
                cell_id,
                samples.len(),
                fmt_vec(&last.center),
                fmt_vec(&last.magnetic_field)
            );
        }
    }
    Ok(())
}
