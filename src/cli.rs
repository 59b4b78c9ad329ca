//! CLI command definitions / 命令行参数

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Text search service over a Markdown/plain-text corpus, with optional llama chat proxy
#[derive(Parser)]
#[command(name = "ragsearch-backend", version)]
pub struct Cli {
    /// Path to config file (default: ./config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Serve only the search API on the search port
        #[arg(long)]
        search_only: bool,
    },

    /// Scan the corpus once and write the cache snapshot
    Scan {
        /// String to search for
        query: String,

        /// Content directory (default: ./content if present, else ./@content)
        #[arg(long)]
        content_dir: Option<PathBuf>,

        /// Output snapshot file
        #[arg(short, long, default_value = "search_results.json")]
        output: PathBuf,

        /// Context characters on each side of a match
        #[arg(long)]
        context_length: Option<usize>,
    },
}
