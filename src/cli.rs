//! Command-line interface for game_results.

use clap::{Parser, Subcommand};

/// Game Results - score tracking backend with per-difficulty rankings
#[derive(Parser, Debug)]
#[command(name = "game_results")]
#[command(about = "Score tracking backend serving top-5 rankings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to bind to (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Store connection string (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,

        /// Origin allowed to call the API from a browser (overrides FRONT_ORIGIN)
        #[arg(long)]
        front_origin: Option<String>,

        /// Keep results in memory instead of the database
        #[arg(long)]
        in_memory: bool,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Store connection string (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },
}
