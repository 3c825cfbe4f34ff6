//! Command-line argument parsing for the script runner
//!
//! Supports:
//! - Replaying an edit script against a fresh buffer manager
//! - Overriding the config file location
//! - Printing a JSON state dump after the run

use clap::Parser;
use std::path::PathBuf;

use crate::config::EngineConfig;

/// Replay edit scripts against gap buffers
#[derive(Parser, Debug)]
#[command(
    name = "gapstore",
    version,
    about = "Replay edit scripts against gap buffers"
)]
pub struct CliArgs {
    /// YAML edit script to run
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Config file to use instead of the default location
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a JSON dump of every buffer after the run
    #[arg(short = 'd', long)]
    pub dump: bool,

    /// Don't print the current buffer's contents
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Also write a debug log to the logs directory
    #[arg(long)]
    pub log_file: bool,
}

impl CliArgs {
    /// Engine config for this run: the `--config` file if given, else the default location
    pub fn load_config(&self) -> EngineConfig {
        match &self.config {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        }
    }
}
