//! Command-line interface for memory_scramble.

use clap::{Parser, Subcommand};

/// Memory Scramble - concurrent multi-player Memory game server
#[derive(Parser, Debug)]
#[command(name = "memory_scramble")]
#[command(about = "Concurrent multi-player Memory game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the board file
        board: std::path::PathBuf,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Reset the board to its initial deal every N seconds
        #[arg(long, value_name = "SECONDS")]
        reset_interval: Option<u64>,
    },

    /// Validate a board file and report its dimensions
    Check {
        /// Path to the board file
        board: std::path::PathBuf,
    },
}
