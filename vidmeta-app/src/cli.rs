use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "vidmeta", version, about = "Look up YouTube video metadata")]
pub struct Cli {
    /// Config file. Without it, `vidmeta.yaml` is read if present.
    #[arg(long, global = true, env = "VIDMETA_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Overrides `client.server_url`.
    #[arg(long, global = true, value_name = "URL")]
    pub server_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive terminal page (default)
    Tui,
    /// Extract one URL and print the page
    Extract {
        url: String,
        /// Print the raw result as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Run the metadata server
    Serve {
        /// Overrides `server.bind`
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}
