//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for docchat
#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(author, version, about = "Chat with a document-analysis service over WebSocket")]
#[command(long_about = r#"
docchat connects to a document-analysis chat service and lets you ask
questions about the documents it has indexed.

Documents are uploaded as one batch: any number of PDF contracts plus two
spreadsheets (the first is the metadata sheet, the second the category sheet).

Configuration files are loaded from (in priority order):
1. DOCCHAT_* environment variables (e.g. DOCCHAT_CONNECTION__ENDPOINT)
2. --config <path>     Explicit config file
3. ./docchat.toml      Project-level config
4. ~/.config/docchat/config.toml   Global config

Example:
  docchat
  docchat --endpoint wss://chat.example.com/ws
  docchat --upload contract.pdf metadata.xlsx categories.xlsx
"#)]
pub struct Cli {
    /// WebSocket endpoint of the chat service
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// HTTP endpoint of the upload service
    #[arg(long, value_name = "URL")]
    pub upload_url: Option<String>,

    /// Upload these files before starting the chat
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub upload: Vec<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
