//! Memory Scramble - unified CLI
//!
//! Concurrent multi-player Memory game server.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use memory_scramble::{Board, Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            board,
            port,
            host,
            reset_interval,
        } => run_server(board, host, port, reset_interval).await,
        Command::Check { board } => run_check(board).await,
    }
}

/// Run the HTTP game server
async fn run_server(
    board_path: PathBuf,
    host: String,
    port: u16,
    reset_interval: Option<u64>,
) -> Result<()> {
    init_tracing();

    info!(board = %board_path.display(), "Starting Memory Scramble server");

    let parsed = memory_scramble::load(&board_path).await?;
    let board = Arc::new(parsed.into_board()?);

    if let Some(seconds) = reset_interval {
        anyhow::ensure!(seconds > 0, "--reset-interval must be positive");
        spawn_reset_job(board.clone(), seconds);
    }

    let app = memory_scramble::router(board);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(%host, port, "Server ready at http://{}:{}/", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

/// Validate a board file and report its dimensions
async fn run_check(board_path: PathBuf) -> Result<()> {
    init_tracing();

    let parsed = memory_scramble::load(&board_path).await?;
    println!(
        "{}x{}, {} cards",
        parsed.rows(),
        parsed.cols(),
        parsed.cards().len()
    );
    Ok(())
}

/// Periodically restores the board to its initial deal.
fn spawn_reset_job(board: Arc<Board>, seconds: u64) {
    info!(seconds, "Scheduling periodic board reset");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(seconds));
        // The first tick completes immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            board.reset().await;
            info!("Periodic board reset complete");
        }
    });
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,memory_scramble=debug")),
        )
        .init();
}
