use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use harvester_engine::DEFAULT_CONFIG_FILENAME;

use crate::logging::LogDestination;

/// Download images from configured feeds into per-channel folders.
#[derive(Debug, Parser)]
#[command(name = "harvester", version, about, long_about = None)]
pub struct Cli {
    /// Channel configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Maximum number of feed items examined per channel
    #[arg(long)]
    pub scan_limit: Option<usize>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Select candidates and list them without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
