//! Tests for the visibility model: watchers wake on face, value, and
//! removal changes, and sleep through control-only transitions.

use memory_scramble::{Board, BoardError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn board() -> Board {
    let mut cards: Vec<String> = ["A", "B", "A", "C", "A"]
        .iter()
        .map(|t| t.to_string())
        .collect();
    for i in 0..20 {
        cards.push(format!("P{}", i / 2));
    }
    Board::new(5, 5, cards).unwrap()
}

fn spot(view: &str, row: usize, col: usize) -> String {
    view.lines().nth(1 + row * 5 + col).unwrap().to_string()
}

#[tokio::test]
async fn test_watch_rejects_blank_viewer() {
    let board = board();
    assert!(matches!(
        board.watch("  ").await,
        Err(BoardError::BadArgument { .. })
    ));
}

#[tokio::test]
async fn test_watcher_stays_pending_without_visible_change() {
    let board = board();
    let mut watching = Box::pin(board.watch("charlie"));
    assert!(timeout(Duration::from_millis(50), &mut watching)
        .await
        .is_err());
}

#[tokio::test]
async fn test_watcher_wakes_on_face_up() {
    let board = board();
    let mut watching = Box::pin(board.watch("charlie"));
    // First poll registers the watcher; no change has happened yet.
    assert!(timeout(Duration::from_millis(20), &mut watching)
        .await
        .is_err());

    board.flip("alice", 0, 0).await.unwrap();
    let rendering = timeout(Duration::from_millis(200), &mut watching)
        .await
        .expect("face-up change should wake the watcher")
        .unwrap();
    assert_eq!(spot(&rendering, 0, 0), "up A");
}

#[tokio::test]
async fn test_watcher_rendering_is_viewer_personalised() {
    let board = board();
    let mut watching = Box::pin(board.watch("alice"));
    assert!(timeout(Duration::from_millis(20), &mut watching)
        .await
        .is_err());

    board.flip("alice", 0, 0).await.unwrap();
    let rendering = timeout(Duration::from_millis(200), &mut watching)
        .await
        .unwrap()
        .unwrap();
    // Alice's own delivery shows her control.
    assert_eq!(spot(&rendering, 0, 0), "my A");
}

#[tokio::test]
async fn test_control_transfer_does_not_wake_watcher() {
    let board = board();
    // Leave (0,0) face-up and uncontrolled: alice flips it, then contends
    // with herself, which releases the card without a face change.
    board.flip("alice", 0, 0).await.unwrap();

    let mut watching = Box::pin(board.watch("charlie"));
    assert!(timeout(Duration::from_millis(20), &mut watching)
        .await
        .is_err());

    let err = board.flip("alice", 0, 0).await.unwrap_err();
    assert!(matches!(err, BoardError::CardAlreadyControlled { .. }));

    // The release was control-only; the watcher must still be pending.
    assert!(timeout(Duration::from_millis(50), &mut watching)
        .await
        .is_err());

    // A real face change still gets through to the same registration.
    board.flip("bob", 1, 0).await.unwrap();
    let rendering = timeout(Duration::from_millis(200), &mut watching)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(spot(&rendering, 1, 0), "up P0");
}

#[tokio::test]
async fn test_watcher_delivery_is_one_shot() {
    let board = Arc::new(board());
    let mut watching = Box::pin(board.watch("charlie"));
    assert!(timeout(Duration::from_millis(20), &mut watching)
        .await
        .is_err());

    board.flip("alice", 0, 0).await.unwrap();
    timeout(Duration::from_millis(200), &mut watching)
        .await
        .unwrap()
        .unwrap();

    // The registration was consumed; later changes need a fresh watch.
    let mut again = Box::pin(board.watch("charlie"));
    assert!(timeout(Duration::from_millis(20), &mut again).await.is_err());
    board.flip("alice", 0, 1).await.unwrap();
    timeout(Duration::from_millis(200), &mut again)
        .await
        .expect("re-registered watcher should be woken")
        .unwrap();
}

#[tokio::test]
async fn test_all_watchers_see_the_same_event() {
    let board = board();
    let mut first = Box::pin(board.watch("bob"));
    let mut second = Box::pin(board.watch("carol"));
    assert!(timeout(Duration::from_millis(20), &mut first).await.is_err());
    assert!(timeout(Duration::from_millis(20), &mut second).await.is_err());

    board.flip("alice", 0, 0).await.unwrap();

    let bob = timeout(Duration::from_millis(200), &mut first)
        .await
        .unwrap()
        .unwrap();
    let carol = timeout(Duration::from_millis(200), &mut second)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(spot(&bob, 0, 0), "up A");
    assert_eq!(spot(&carol, 0, 0), "up A");
}

#[tokio::test]
async fn test_reset_wakes_watchers_even_without_changes() {
    let board = board();
    let mut watching = Box::pin(board.watch("charlie"));
    assert!(timeout(Duration::from_millis(20), &mut watching)
        .await
        .is_err());

    // The board is already in its initial state; reset still counts.
    board.reset().await;
    let rendering = timeout(Duration::from_millis(200), &mut watching)
        .await
        .expect("reset should wake the watcher")
        .unwrap();
    assert!(rendering.lines().skip(1).all(|line| line == "down"));
}

#[tokio::test]
async fn test_reset_cancels_blocked_flips() {
    let board = Arc::new(board());
    board.flip("alice", 0, 0).await.unwrap();

    let mut contender = Box::pin(board.flip("bob", 0, 0));
    assert!(timeout(Duration::from_millis(50), &mut contender)
        .await
        .is_err());

    board.reset().await;
    let err = timeout(Duration::from_millis(200), &mut contender)
        .await
        .expect("reset should unblock the contender")
        .unwrap_err();
    assert_eq!(err, BoardError::Cancelled);
}

#[tokio::test]
async fn test_abandoned_blocked_flip_leaves_board_usable() {
    let board = Arc::new(board());
    board.flip("alice", 0, 0).await.unwrap();

    // The contender gives up mid-wait; dropping its flip abandons the
    // queued hand-off.
    {
        let mut contender = Box::pin(board.flip("bob", 0, 0));
        assert!(timeout(Duration::from_millis(50), &mut contender)
            .await
            .is_err());
    }

    // Releasing the card resolves the dead promise as a no-op.
    board.flip("alice", 0, 1).await.unwrap();
    board.flip("carol", 0, 0).await.unwrap();
    assert_eq!(spot(&board.view("carol").await.unwrap(), 0, 0), "my A");
}
