//! Memory Scramble library - a concurrent multi-player Memory game.
//!
//! Unlike the classical turn-based game, any number of players interact
//! with the same board at once. Correctness rests on the board's
//! concurrency and card-ownership discipline rather than turn arbitration.
//!
//! # Architecture
//!
//! - **Board**: the thread-safe game core - flip state machine, per-player
//!   control, blocked-flip hand-offs, and long-poll change watchers
//! - **Parser**: textual board-file loader
//! - **Server**: plain-text HTTP routes over a shared board
//! - **Cli**: command-line entry points (serve, check)
//!
//! # Example
//!
//! ```no_run
//! use memory_scramble::Board;
//!
//! # async fn example() -> Result<(), memory_scramble::BoardError> {
//! let board = Board::new(1, 2, vec!["A".into(), "A".into()])?;
//! board.flip("alice", 0, 0).await?;
//! board.flip("alice", 0, 1).await?;
//! println!("{}", board.view("alice").await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod cli;
mod parser;
mod server;

// Crate-level exports - Board core
pub use board::{Board, BoardError, Card, Position};

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Board-file parser
pub use parser::{load, parse, ParseError, ParsedBoard};

// Crate-level exports - HTTP surface
pub use server::router;
