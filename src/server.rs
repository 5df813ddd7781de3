//! Plain-text HTTP surface over the shared board.
//!
//! Every route answers `text/plain`. Successful game routes reply with the
//! caller's current rendering of the board; every board error maps to a
//! single conflict status carrying the error's display text.

use crate::board::{Board, BoardError, Card};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Builds the game router over a shared board.
pub fn router(board: Arc<Board>) -> Router {
    Router::new()
        .route("/look/{player}", get(look))
        .route("/flip/{player}/{spot}", get(flip))
        .route("/replace/{player}/{from}/{to}", get(replace))
        .route("/watch/{player}", get(watch))
        .route("/health", get(health))
        .with_state(board)
}

/// Renders the board for the caller.
#[instrument(skip(board))]
async fn look(
    State(board): State<Arc<Board>>,
    Path(player): Path<String>,
) -> (StatusCode, String) {
    respond(board.view(&player).await)
}

/// Flips a card, then renders the board for the caller.
///
/// The spot segment is `row,col`, zero-based.
#[instrument(skip(board))]
async fn flip(
    State(board): State<Arc<Board>>,
    Path((player, spot)): Path<(String, String)>,
) -> (StatusCode, String) {
    let outcome = async {
        let (row, col) = parse_spot(&spot)?;
        board.flip(&player, row, col).await?;
        board.view(&player).await
    };
    respond(outcome.await)
}

/// Replaces every card equal to `from` with `to`, then renders the board
/// for the caller.
#[instrument(skip(board))]
async fn replace(
    State(board): State<Arc<Board>>,
    Path((player, from, to)): Path<(String, String, String)>,
) -> (StatusCode, String) {
    let outcome = async {
        let from = Card::parse(&from)?;
        let to = Card::parse(&to)?;
        info!(%from, %to, "replacing cards");
        board
            .map(|card| {
                let replacement = if card == from {
                    to.as_str().to_string()
                } else {
                    card.as_str().to_string()
                };
                async move { replacement }
            })
            .await?;
        board.view(&player).await
    };
    respond(outcome.await)
}

/// Long-polls until the next visible board change, then delivers the
/// caller's fresh rendering.
#[instrument(skip(board))]
async fn watch(
    State(board): State<Arc<Board>>,
    Path(player): Path<String>,
) -> (StatusCode, String) {
    respond(board.watch(&player).await)
}

/// Liveness probe.
async fn health() -> (StatusCode, String) {
    (StatusCode::OK, "ok".to_string())
}

fn parse_spot(spot: &str) -> Result<(usize, usize), BoardError> {
    let malformed =
        || BoardError::bad_argument(format!("spot {spot:?} must be <row>,<col>"));
    let (row, col) = spot.split_once(',').ok_or_else(malformed)?;
    let row = row.parse().map_err(|_| malformed())?;
    let col = col.parse().map_err(|_| malformed())?;
    Ok((row, col))
}

fn respond(outcome: Result<String, BoardError>) -> (StatusCode, String) {
    match outcome {
        Ok(body) => {
            debug!("request ok");
            (StatusCode::OK, body)
        }
        Err(err) => {
            warn!(%err, "request refused");
            (StatusCode::CONFLICT, err.to_string())
        }
    }
}
