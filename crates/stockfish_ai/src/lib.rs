//! Stockfish as an external move provider
//!
//! Implements [`chess_engine::ExternalEngine`] on top of the `stockfish`
//! crate. Each request runs its own short-lived engine instance.

mod engine;

pub use engine::{StockfishEngine, DEFAULT_DEPTH, DEFAULT_GRACE};
