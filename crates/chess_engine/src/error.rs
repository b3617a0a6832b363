//! Error types for chess engine
//!
//! Provides custom error types for engine operations including
//! position decoding, move validation and the search itself.

use thiserror::Error;

/// Errors that can occur in the chess engine
#[derive(Error, Debug)]
pub enum ChessEngineError {
    /// Position string could not be decoded into a legal position
    #[error("Invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move text could not be parsed or is not legal in the position
    #[error("Illegal move {uci:?} in position {fen}")]
    IllegalMove { uci: String, fen: String },

    /// Position has no legal moves (checkmate or stalemate)
    #[error("No legal moves in position {fen}")]
    NoLegalMoves { fen: String },

    /// Search algorithm error - stack corruption or logic error
    #[error("Search algorithm error: {message}")]
    SearchError { message: String },

    /// Pop without a matching push
    #[error("Stack underflow: pop without a matching push")]
    StackUnderflow,
}

/// Result type alias for chess engine operations
pub type ChessEngineResult<T> = Result<T, ChessEngineError>;
