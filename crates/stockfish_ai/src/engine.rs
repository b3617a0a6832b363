use async_trait::async_trait;
use chess_engine::{EngineBudget, ExternalEngine, ExternalEngineError};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stockfish::Stockfish;

/// Extra time allowed on top of `movetime` for process start-up and the handshake
pub const DEFAULT_GRACE: Duration = Duration::from_millis(1500);

/// Stockfish search depth per request
pub const DEFAULT_DEPTH: u32 = 12;

/// Stockfish (or any UCI engine) at a fixed path
///
/// Every call starts its own engine instance on the blocking pool, searches
/// one position and drops it, which closes the engine's input and ends the
/// process.
#[derive(Debug, Clone)]
pub struct StockfishEngine {
    path: PathBuf,
    depth: u32,
    grace: Duration,
}

impl StockfishEngine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            depth: DEFAULT_DEPTH,
            grace: DEFAULT_GRACE,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// One engine instance, one position
fn run_session(path: &Path, fen: &str, depth: u32) -> Result<String, ExternalEngineError> {
    let mut stockfish = Stockfish::new(&path.to_string_lossy()).map_err(|source| {
        ExternalEngineError::Spawn {
            path: path.display().to_string(),
            source,
        }
    })?;

    stockfish.setup_for_new_game()?;
    stockfish.set_fen_position(fen.trim())?;
    stockfish.set_depth(depth);

    let output = stockfish.go()?;
    debug!("stockfish replied {}", output.best_move());
    reply_to_move(output.best_move())
}

/// Map the engine's `bestmove` text to a move or [`ExternalEngineError::NoMove`]
fn reply_to_move(reply: &str) -> Result<String, ExternalEngineError> {
    match reply.split_whitespace().next() {
        None | Some("(none)") | Some("0000") => Err(ExternalEngineError::NoMove),
        Some(mv) => Ok(mv.to_string()),
    }
}

#[async_trait]
impl ExternalEngine for StockfishEngine {
    async fn best_move(&self, fen: &str, budget: EngineBudget) -> Result<String, ExternalEngineError> {
        if let Some(elo) = budget.elo {
            debug!("strength limit {} requested, engine plays at full strength", elo);
        }

        let path = self.path.clone();
        let fen = fen.to_string();
        let depth = self.depth;
        let session = tokio::task::spawn_blocking(move || run_session(&path, &fen, depth));

        let deadline = budget.movetime + self.grace;
        match tokio::time::timeout(deadline, session).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => Err(ExternalEngineError::Protocol(format!(
                "engine task failed: {}",
                err
            ))),
            Err(_) => {
                warn!("{} gave no move within {:?}", self.path.display(), deadline);
                Err(ExternalEngineError::Timeout(deadline))
            }
        }
    }

    fn name(&self) -> &str {
        "stockfish"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_to_move() {
        assert_eq!(reply_to_move("e2e4").unwrap(), "e2e4");
        assert_eq!(reply_to_move("e7e8q").unwrap(), "e7e8q");
        assert!(matches!(reply_to_move("(none)"), Err(ExternalEngineError::NoMove)));
        assert!(matches!(reply_to_move("0000"), Err(ExternalEngineError::NoMove)));
        assert!(matches!(reply_to_move(""), Err(ExternalEngineError::NoMove)));
    }

    #[test]
    fn test_builder() {
        let engine = StockfishEngine::new("/usr/games/stockfish").with_depth(0);
        assert_eq!(engine.depth(), 1);
        assert_eq!(engine.path(), Path::new("/usr/games/stockfish"));
        assert_eq!(StockfishEngine::new("sf").depth(), DEFAULT_DEPTH);
    }
}
