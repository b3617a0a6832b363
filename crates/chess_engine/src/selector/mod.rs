//! Move selection pipeline
//!
//! Opening book first, then the external engine, then the local search. The
//! first source to produce a legal move wins and the move is applied to a copy
//! of the position. Failures of the book or the external engine are logged
//! and absorbed; only a position without legal moves is reported back.

pub mod external;

use crate::board::{apply_move, is_legal, move_to_uci, parse_uci_move, to_fen, Board};
use crate::book::OpeningBook;
use crate::constants::BOOK_HORIZON;
use crate::error::ChessEngineError;
use crate::search::SearchEngine;
use external::{EngineBudget, ExternalEngine};
use shakmaty::{Chess, Move, Position};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Which stage of the pipeline produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveSource {
    Book,
    ExternalEngine,
    Search,
}

impl MoveSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::ExternalEngine => "engine",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for MoveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chosen move, where it came from, and the position after playing it
#[derive(Debug, Clone)]
pub struct Selection {
    pub mv: Move,
    pub source: MoveSource,
    /// Search score from White's point of view, only for [`MoveSource::Search`]
    pub score: Option<i32>,
    pub position: Chess,
}

impl Selection {
    pub fn uci(&self) -> String {
        move_to_uci(&self.mv)
    }

    pub fn fen(&self) -> String {
        to_fen(&self.position)
    }
}

#[derive(Error, Debug)]
pub enum SelectError {
    /// Checkmate or stalemate: there is nothing to play
    #[error("No move available in position {fen}")]
    NoMoveAvailable { fen: String },

    #[error(transparent)]
    Engine(#[from] ChessEngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Last full-move number at which the book is consulted
    pub book_horizon: u32,
    pub budget: EngineBudget,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            book_horizon: BOOK_HORIZON,
            budget: EngineBudget::default(),
        }
    }
}

pub struct MoveSelector {
    config: SelectorConfig,
    book: OpeningBook,
    engine: Option<Box<dyn ExternalEngine>>,
    search: SearchEngine,
}

impl MoveSelector {
    pub fn new(config: SelectorConfig, book: OpeningBook, search: SearchEngine) -> Self {
        Self {
            config,
            book,
            engine: None,
            search,
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn ExternalEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Pick a move for `pos` and play it
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NoMoveAvailable`] when the game is over. Book and
    /// engine failures never surface here.
    pub async fn select_and_apply(&mut self, pos: &Chess) -> Result<Selection, SelectError> {
        if pos.is_game_over() {
            return Err(SelectError::NoMoveAvailable { fen: to_fen(pos) });
        }

        let (mv, source, score) = if let Some(mv) = self.from_book(pos) {
            (mv, MoveSource::Book, None)
        } else if let Some(mv) = self.from_engine(pos).await {
            (mv, MoveSource::ExternalEngine, None)
        } else {
            let (mv, score) = self.from_search(pos)?;
            (mv, MoveSource::Search, Some(score))
        };

        let position = apply_move(pos, &mv)?;
        info!("[SELECT] {} from {}", move_to_uci(&mv), source);

        Ok(Selection {
            mv,
            source,
            score,
            position,
        })
    }

    fn from_book(&self, pos: &Chess) -> Option<Move> {
        if pos.fullmoves().get() > self.config.book_horizon {
            return None;
        }

        let mv = self.book.lookup(pos)?;
        if is_legal(pos, &mv) {
            Some(mv)
        } else {
            warn!("[SELECT] book move {} is not legal in {}", move_to_uci(&mv), to_fen(pos));
            None
        }
    }

    async fn from_engine(&self, pos: &Chess) -> Option<Move> {
        let engine = self.engine.as_ref()?;
        let fen = to_fen(pos);

        let reply = match engine.best_move(&fen, self.config.budget).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("[SELECT] {} failed: {}", engine.name(), err);
                return None;
            }
        };

        match parse_uci_move(pos, &reply) {
            Ok(mv) => Some(mv),
            Err(err) => {
                warn!("[SELECT] {} replied {:?}: {}", engine.name(), reply, err);
                None
            }
        }
    }

    fn from_search(&mut self, pos: &Chess) -> Result<(Move, i32), SelectError> {
        let mut board = Board::new(pos.clone());
        let depth = self.search.config().depth;
        match self.search.best_move(&mut board, depth) {
            Ok(result) => {
                debug!("[SELECT] search score {}", result.score);
                Ok((result.mv, result.score))
            }
            Err(ChessEngineError::NoLegalMoves { fen }) => Err(SelectError::NoMoveAvailable { fen }),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::FingerprintMode;

    #[test]
    fn test_source_labels() {
        assert_eq!(MoveSource::Book.as_str(), "book");
        assert_eq!(MoveSource::ExternalEngine.to_string(), "engine");
        assert_eq!(MoveSource::Search.as_str(), "search");
    }

    #[test]
    fn test_default_config() {
        let config = SelectorConfig::default();
        assert_eq!(config.book_horizon, 10);
        assert_eq!(config.budget.movetime.as_millis(), 500);
        assert_eq!(config.budget.elo, Some(1800));
    }

    #[test]
    fn test_book_respects_horizon() {
        let book = OpeningBook::from_pgn("1. e4 e5 *", FingerprintMode::Strict).unwrap();
        let selector = MoveSelector::new(
            SelectorConfig {
                book_horizon: 0,
                ..SelectorConfig::default()
            },
            book,
            SearchEngine::default(),
        );
        assert!(selector.from_book(&Chess::default()).is_none());
    }

    #[test]
    fn test_search_runs_at_the_engine_depth() {
        use crate::search::SearchConfig;

        let pos = Chess::default();
        let shallow = || {
            SearchEngine::new(SearchConfig {
                depth: 1,
                ..SearchConfig::default()
            })
        };

        let mut reference = shallow();
        let expected = reference.best_move(&mut Board::new(pos.clone()), 1).unwrap();

        let mut selector = MoveSelector::new(
            SelectorConfig::default(),
            OpeningBook::empty(FingerprintMode::Full),
            shallow(),
        );
        let (mv, score) = selector.from_search(&pos).unwrap();

        assert_eq!(mv, expected.mv);
        assert_eq!(score, expected.score);
        assert_eq!(selector.search_engine().stats(), reference.stats());
    }
}
