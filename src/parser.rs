//! Board-file loader.
//!
//! A board file is a `<rows>x<cols>` header line followed by one card token
//! per line, `rows * cols` tokens in row-major order. Tokens are non-empty
//! and contain no whitespace.

use crate::board::{Board, BoardError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use std::path::Path;
use tracing::{info, instrument};

/// Failures while reading or parsing a board file.
#[derive(Debug, Display, Error)]
pub enum ParseError {
    /// The first line did not match `<rows>x<cols>`.
    #[display("line 1 must be <rows>x<cols>, got {header:?}")]
    BadHeader {
        /// The offending header line.
        header: String,
    },

    /// The declared grid has a zero dimension.
    #[display("board dimensions must be positive, got {rows}x{cols}")]
    EmptyBoard {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
    },

    /// A token line was empty or contained whitespace.
    #[display("line {line}: invalid card token {token:?}")]
    BadToken {
        /// One-based line number in the file.
        line: usize,
        /// The offending token text.
        token: String,
    },

    /// The number of token lines did not match the declared grid.
    #[display("expected {expected} card tokens, found {found}")]
    WrongCount {
        /// Tokens the header calls for.
        expected: usize,
        /// Tokens actually present.
        found: usize,
    },

    /// The board file could not be read.
    #[display("failed to read board file: {_0}")]
    Io(#[error(source)] std::io::Error),
}

/// A validated board description, ready to become a [`Board`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ParsedBoard {
    /// Declared row count.
    rows: usize,
    /// Declared column count.
    cols: usize,
    /// Card tokens in row-major order.
    cards: Vec<String>,
}

impl ParsedBoard {
    /// Consumes the description and constructs the board.
    pub fn into_board(self) -> Result<Board, BoardError> {
        Board::new(self.rows, self.cols, self.cards)
    }
}

/// Parses board-file text.
///
/// # Errors
///
/// Returns the first grammar violation encountered: a malformed header, a
/// zero dimension, an invalid token, or a token count that does not match
/// the declared grid.
#[instrument(skip(source))]
pub fn parse(source: &str) -> Result<ParsedBoard, ParseError> {
    let mut lines = source.lines();
    let header = lines.next().unwrap_or_default();
    let (rows, cols) = parse_header(header)?;
    if rows == 0 || cols == 0 {
        return Err(ParseError::EmptyBoard { rows, cols });
    }

    let expected = rows * cols;
    let mut cards = Vec::with_capacity(expected);
    for (index, token) in lines.enumerate() {
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(ParseError::BadToken {
                line: index + 2,
                token: token.to_string(),
            });
        }
        cards.push(token.to_string());
    }
    if cards.len() != expected {
        return Err(ParseError::WrongCount {
            expected,
            found: cards.len(),
        });
    }
    Ok(ParsedBoard { rows, cols, cards })
}

/// Reads and parses a board file from disk.
///
/// # Errors
///
/// Returns [`ParseError::Io`] when the file cannot be read, or any grammar
/// violation from [`parse`].
#[instrument]
pub async fn load(path: &Path) -> Result<ParsedBoard, ParseError> {
    let source = tokio::fs::read_to_string(path).await.map_err(ParseError::Io)?;
    let parsed = parse(&source)?;
    info!(rows = parsed.rows, cols = parsed.cols, "loaded board file");
    Ok(parsed)
}

fn parse_header(header: &str) -> Result<(usize, usize), ParseError> {
    let bad = || ParseError::BadHeader {
        header: header.to_string(),
    };
    let (rows, cols) = header.split_once('x').ok_or_else(bad)?;
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(rows) || !all_digits(cols) {
        return Err(bad());
    }
    let rows = rows.parse().map_err(|_| bad())?;
    let cols = cols.parse().map_err(|_| bad())?;
    Ok((rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_valid_board() {
        let parsed = parse("2x3\nA\nB\nC\nA\nB\nC\n").unwrap();
        assert_eq!(*parsed.rows(), 2);
        assert_eq!(*parsed.cols(), 3);
        assert_eq!(parsed.cards().len(), 6);
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(matches!(parse("2by3\nA\n"), Err(ParseError::BadHeader { .. })));
        assert!(matches!(parse("x3\nA\n"), Err(ParseError::BadHeader { .. })));
        assert!(matches!(parse("-2x3\nA\n"), Err(ParseError::BadHeader { .. })));
        assert!(matches!(parse(""), Err(ParseError::BadHeader { .. })));
    }

    #[test]
    fn test_rejects_zero_dimension() {
        assert!(matches!(parse("0x3\n"), Err(ParseError::EmptyBoard { .. })));
    }

    #[test]
    fn test_rejects_bad_token() {
        let err = parse("1x2\nA\nbad token\n").unwrap_err();
        assert!(matches!(err, ParseError::BadToken { line: 3, .. }));
    }

    #[test]
    fn test_rejects_wrong_count() {
        assert!(matches!(
            parse("2x2\nA\nB\nC\n"),
            Err(ParseError::WrongCount {
                expected: 4,
                found: 3
            })
        ));
        assert!(matches!(
            parse("1x1\nA\nB\n"),
            Err(ParseError::WrongCount { .. })
        ));
    }

    #[tokio::test]
    async fn test_into_board_renders() {
        let board = parse("1x2\nA\nA\n").unwrap().into_board().unwrap();
        // Constructed boards start fully face-down.
        assert_eq!(board.view("alice").await.unwrap(), "1x2\ndown\ndown\n");
    }

    #[tokio::test]
    async fn test_load_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt");
        tokio::fs::write(&path, "1x2\nA\nA\n").await.unwrap();
        let parsed = load(&path).await.unwrap();
        assert_eq!(parsed, parse("1x2\nA\nA\n").unwrap());
    }

    #[tokio::test]
    async fn test_load_surfaces_io_failure() {
        let missing = Path::new("definitely/not/a/board.txt");
        assert!(matches!(load(missing).await, Err(ParseError::Io(_))));
    }
}
