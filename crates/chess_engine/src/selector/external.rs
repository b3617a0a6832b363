//! Contract for an out-of-process move provider

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{DEFAULT_ENGINE_ELO, DEFAULT_ENGINE_MOVETIME_MS};

/// Per-call resource budget handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineBudget {
    pub movetime: Duration,
    /// Requested playing strength. Accepted but not forwarded to the engine.
    pub elo: Option<u32>,
}

impl Default for EngineBudget {
    fn default() -> Self {
        Self {
            movetime: Duration::from_millis(DEFAULT_ENGINE_MOVETIME_MS),
            elo: Some(DEFAULT_ENGINE_ELO),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExternalEngineError {
    #[error("Failed to start engine {path:?}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Engine reported no move")]
    NoMove,

    #[error("Unexpected engine output: {0}")]
    Protocol(String),
}

/// Something that can suggest a move for a FEN position
///
/// Replies are UCI move text. The caller validates legality, so an
/// implementation may return anything it likes; a failure is never fatal to
/// the caller.
#[async_trait]
pub trait ExternalEngine: Send + Sync {
    async fn best_move(&self, fen: &str, budget: EngineBudget) -> Result<String, ExternalEngineError>;

    /// Short label for logs
    fn name(&self) -> &str {
        "external engine"
    }
}
