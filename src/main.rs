//! Brandkit - favicon and logo asset generator.

mod adapters;
mod cli;
mod config;
mod context;
mod error;
mod generator;
mod logging;
mod model;
mod monogram;
mod output;
mod params;
mod ports;

use std::process;

use clap::Parser;

use crate::adapters::command::VersionProbe;
use crate::cli::Cli;
use crate::config::{discover_config_path, Config};
use crate::context::BackendContext;
use crate::error::AssetError;
use crate::generator::generate;
use crate::model::{parse_fallback, parse_preference};
use crate::monogram::Monogram;
use crate::params::build_plan;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AssetError> {
    // Load config
    let config_path = discover_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path).map_err(AssetError::Config)?;
    cli.apply_overrides(&mut config);

    if cli.verbose {
        eprintln!("Config: {}", config_path.display());
    }

    if let Some(ref text) = cli.monogram {
        let monogram =
            Monogram::from_config(text, &config.monogram).map_err(AssetError::InvalidArgument)?;
        if monogram.font.is_none() {
            tracing::debug!("no usable font; monogram is background only");
        }
        for path in monogram.write(&config.monogram.output_dir, &config.favicon.name)? {
            eprintln!("Saved: {}", path.display());
        }
        return Ok(());
    }

    // Validate parameters
    let preference = parse_preference(&config.backend).map_err(AssetError::InvalidArgument)?;
    let fallback = parse_fallback(&config.fallback).map_err(AssetError::InvalidArgument)?;
    let plan = build_plan(&config).map_err(AssetError::Config)?;

    if !config.source.is_file() {
        return Err(AssetError::SourceMissing(config.source.clone()));
    }

    let ctx = BackendContext::resolve(preference, fallback, &VersionProbe);
    if cli.verbose {
        eprintln!("Backend: {}", ctx.backend.kind().name());
    }

    let report = generate(&ctx, &config.source, &config.output_dir, &plan)?;

    eprintln!("Files in {}:", config.output_dir.display());
    for line in report.summary_lines() {
        eprintln!("{line}");
    }
    if !report.all_present() {
        eprintln!("Warning: some assets could not be written");
    }

    Ok(())
}
