//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Favicon and logo asset generator - resize, invert and pad a source logo.
///
/// With no arguments, reads the built-in source path and writes the full
/// asset set next to it.
#[derive(Parser, Debug)]
#[command(name = "brandkit", version, about)]
pub struct Cli {
    /// Source logo image.
    #[arg(short, long)]
    pub source: Option<String>,

    /// Directory that receives the generated files.
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Backend: auto, tools, library, convert, magick, sips, none.
    #[arg(short, long)]
    pub backend: Option<String>,

    /// How placeholders are placed when a transform is impossible: copy, symlink.
    #[arg(long)]
    pub fallback: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Render a text-only favicon with this text instead of using the source.
    #[arg(short, long, value_name = "TEXT")]
    pub monogram: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay command-line values on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref source) = self.source {
            config.source = PathBuf::from(source);
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir = PathBuf::from(dir);
            config.monogram.output_dir = PathBuf::from(dir);
        }
        if let Some(ref backend) = self.backend {
            config.backend.clone_from(backend);
        }
        if let Some(ref fallback) = self.fallback {
            config.fallback.clone_from(fallback);
        }
    }
}
