use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::pipeline::extract::{DEFAULT_CLUSTERS, DEFAULT_MAX_DIM};
use crate::pipeline::loader::ExtractOptions;

/// Extract a color palette from an image and preview it as caption colors.
#[derive(Parser, Debug)]
#[command(name = "palette-preview", version, about)]
pub struct Args {
    /// Path to the input image (opens the interactive picker if omitted)
    pub image: Option<PathBuf>,

    /// Launch interactive TUI mode
    #[arg(long)]
    pub tui: bool,

    /// Print colored swatches alongside the hex listing
    #[arg(long)]
    pub preview: bool,

    /// Number of K-means clusters
    #[arg(short = 'k', long = "colors", default_value_t = DEFAULT_CLUSTERS)]
    pub colors: usize,

    /// Downscale images so neither side exceeds this many pixels before clustering
    #[arg(long, default_value_t = DEFAULT_MAX_DIM)]
    pub max_dim: u32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// The TUI runs when asked for or when there is no image to list.
    pub fn interactive(&self) -> bool {
        self.tui || self.image.is_none()
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            clusters: self.colors,
            max_dim: self.max_dim,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
