//! Root move selection
//!
//! Searches every legal root move one ply shallower and keeps the move with
//! the extremal score for the side to move.

use super::{SearchEngine, SearchResult, SearchStats};
use crate::board::Board;
use crate::constants::SCORE_INFINITY;
use crate::error::{ChessEngineError, ChessEngineResult};
use instant::Instant;
use shakmaty::Color;
use tracing::debug;

impl SearchEngine {
    /// Best move for the side to move, searched `depth` plies deep
    ///
    /// Ties keep the first move in the rules provider's enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`ChessEngineError::NoLegalMoves`] for checkmate or stalemate.
    /// Callers are expected to check for game over first.
    pub fn best_move(&mut self, board: &mut Board, depth: u32) -> ChessEngineResult<SearchResult> {
        let moves = board.legal_moves();
        if moves.is_empty() {
            return Err(ChessEngineError::NoLegalMoves { fen: board.fen() });
        }

        self.stats = SearchStats::default();
        let start_time = Instant::now();
        let maximizing = board.turn() == Color::White;
        let child_depth = depth.saturating_sub(1);
        let mut best: Option<SearchResult> = None;

        for mv in moves {
            board.push(&mv);
            let score = self.search(board, child_depth, -SCORE_INFINITY, SCORE_INFINITY, !maximizing);
            board.pop()?;
            let score = score?;

            let improves = match &best {
                None => true,
                Some(current) if maximizing => score > current.score,
                Some(current) => score < current.score,
            };
            if improves {
                best = Some(SearchResult { mv, score });
            }
        }

        let result = best.ok_or_else(|| ChessEngineError::SearchError {
            message: "best_move: no root move was scored".to_string(),
        })?;

        let stats = self.stats;
        debug!(
            "[SEARCH] depth {} best {} score {} | nodes {} qnodes {} evals {} tt hits {} cutoffs {} | {:?} | cache {}",
            depth,
            result.uci(),
            result.score,
            stats.nodes,
            stats.quiescence_nodes,
            stats.evaluations,
            stats.cache_hits,
            stats.cutoffs,
            start_time.elapsed(),
            self.cache.len(),
        );

        Ok(result)
    }
}
