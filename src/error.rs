//! Error types for the chess engine
//!
//! Covers malformed position input and rejected moves. Internal board
//! invariant breaks are programmer errors and are asserted instead.

use thiserror::Error;

/// Errors reported by the engine's public operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Piece placement or side-to-move field could not be parsed
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move text is not of the form `<from><to>[n|b|r|q]`
    #[error("Invalid move notation: '{0}'")]
    InvalidNotation(String),

    /// Move is well formed but not legal in the current position
    #[error("Illegal move: '{0}'")]
    IllegalMove(String),

    /// The side to move has no piece on the origin square
    #[error("No piece of the side to move on {0}")]
    EmptySquare(String),
}

impl ChessError {
    pub(crate) fn invalid_fen(fen: &str, reason: impl Into<String>) -> Self {
        ChessError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for engine operations
pub type ChessResult<T> = Result<T, ChessError>;
