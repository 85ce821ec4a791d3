use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

use mhdsnap::config::DecoderBuilder;
use mhdsnap::metrics;

mod cli;
mod cmd_center;
mod cmd_dump;
mod cmd_legacy;
mod cmd_records;
mod util;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт: info.
    // Пример: RUST_LOG=debug mhdsnap dump out.dc
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        // Логируем ошибку и выходим с кодом 1.
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    // env first, then command-line overrides
    let mut builder = DecoderBuilder::new();
    if let cli::Cmd::Dump { chunk: Some(n), .. } = &cli.cmd {
        builder = builder.cell_chunk(*n);
    }
    let cfg = builder.build();
    log::debug!("{}", cfg);

    match cli.cmd {
        cli::Cmd::Dump { files, json, .. } =>
            cmd_dump::exec(&files, json, &cfg)?,

        cli::Cmd::Records { path, vars, indices, json } =>
            cmd_records::exec(&path, &vars, &indices, json, &cfg)?,

        cli::Cmd::Legacy { files, json } =>
            cmd_legacy::exec(&files, json, &cfg)?,

        cli::Cmd::Center { path, cells } =>
            cmd_center::exec(&path, &cells, &cfg)?,
    }

    if cli.stats {
        println!("{}", serde_json::to_string(&metrics::snapshot())?);
    }
    Ok(())
}
