use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Default, Parser)]
#[command(author, version, about = "Export subreddit threads, comments and authors to CSV")]
pub struct Cli {
    #[arg(long, default_value = "top")]
    pub mode: Mode,
    /// Run the keyword search and report matches without writing CSV output.
    #[arg(long, default_value_t = false)]
    pub discover_only: bool,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub skip: Option<usize>,
    #[arg(long)]
    pub subreddit: Option<String>,
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub rankings: Option<String>,
    #[arg(long)]
    pub time_filter: Option<String>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long)]
    pub error_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Top,
    Search,
}
