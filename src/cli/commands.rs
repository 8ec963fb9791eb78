//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Copy images matching a search query from one Philomena booru to another
#[derive(Parser, Debug)]
#[command(name = "philomena-copier")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source booru URL (e.g. derpibooru.org)
    #[arg(long, env = "PHILOMENA_SOURCE")]
    pub source: Option<String>,

    /// Source booru API key
    #[arg(long, env = "PHILOMENA_SOURCE_KEY", hide_env_values = true)]
    pub source_key: Option<String>,

    /// Target booru URL
    #[arg(long, env = "PHILOMENA_TARGET")]
    pub target: Option<String>,

    /// Target booru API key
    #[arg(long, env = "PHILOMENA_TARGET_KEY", hide_env_values = true)]
    pub target_key: Option<String>,

    /// Search query to copy; anything the source site accepts works
    #[arg(short, long, env = "PHILOMENA_QUERY")]
    pub query: Option<String>,

    /// Tuning file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Start copying without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
