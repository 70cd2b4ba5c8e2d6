use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Terminal media player with a seekable transport bar", long_about = None)]
pub struct Cli {
    /// Use this config file instead of the per-user one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play the first source that can be opened
    Play {
        /// Media files or URLs, tried in order before the configured `sources`
        sources: Vec<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write a config file with the current values if none exists
        #[arg(long)]
        init: bool,
    },

    /// Print the duration and title a source would play with
    Probe {
        /// Media file or URL
        source: String,
    },
}
