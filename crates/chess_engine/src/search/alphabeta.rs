//! Alpha-beta minimax (ITERATIVE VERSION - No recursion)
//!
//! Each `SearchFrame` stands in for one recursive call. Children are pushed
//! onto an explicit stack and hand their score back to the parent frame, so
//! search depth never grows the native call stack.

use super::{unwind, Frame, SearchEngine};
use crate::board::Board;
use crate::constants::SCORE_INFINITY;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::hash::{Bound, Fingerprint, FingerprintMode};
use shakmaty::Move;

/// Stack frame for iterative alphabeta search
struct SearchFrame {
    fingerprint: Fingerprint,
    depth: u32,
    alpha: i32,
    beta: i32,
    /// Window the node was entered with, used to tag the cached result
    entry_alpha: i32,
    entry_beta: i32,
    maximizing: bool,
    expanded: bool,
    moves: Vec<Move>,
    move_index: usize,
    best: i32,
    returning_score: Option<i32>,
}

impl SearchFrame {
    fn new(
        board: &Board,
        mode: FingerprintMode,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> Self {
        Self {
            fingerprint: board.fingerprint(mode),
            depth,
            alpha,
            beta,
            entry_alpha: alpha,
            entry_beta: beta,
            maximizing,
            expanded: false,
            moves: Vec::new(),
            move_index: 0,
            best: if maximizing {
                -SCORE_INFINITY
            } else {
                SCORE_INFINITY
            },
            returning_score: None,
        }
    }
}

impl Frame for SearchFrame {
    fn receive(&mut self, score: i32) {
        self.returning_score = Some(score);
    }
}

impl SearchEngine {
    /// Minimax value of `board` searched `depth` plies deep inside `[alpha, beta]`
    ///
    /// Scores are from White's point of view; `maximizing` says whether the
    /// node picks the highest (White to move) or lowest child score. The board
    /// is returned to its entry state before this function returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit stack is corrupted (unbalanced pops).
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> ChessEngineResult<i32> {
        let mode = self.config.fingerprint;
        let mut stack = vec![SearchFrame::new(board, mode, depth, alpha, beta, maximizing)];

        // Main search loop (replaces recursion)
        while let Some(frame) = stack.last_mut() {
            // === PHASE 1: Frame Initialization (first visit) ===
            if !frame.expanded {
                frame.expanded = true;
                self.stats.nodes += 1;

                // Transposition table lookup
                if let Some(entry) = self.cache.get(&frame.fingerprint, frame.depth) {
                    if entry.is_usable(frame.alpha, frame.beta) {
                        self.stats.cache_hits += 1;
                        if let Some(score) = unwind(&mut stack, entry.value) {
                            return Ok(score);
                        }
                        continue;
                    }
                }

                // Horizon or game over: resolve captures, then cache at this depth
                if frame.depth == 0 || board.is_terminal() {
                    let score =
                        self.quiescence_search(board, frame.alpha, frame.beta, frame.maximizing)?;
                    let bound = Bound::classify(score, frame.entry_alpha, frame.entry_beta);
                    self.cache
                        .put(frame.fingerprint.clone(), frame.depth, score, bound);

                    if let Some(score) = unwind(&mut stack, score) {
                        return Ok(score);
                    }
                    continue;
                }

                frame.moves = board.legal_moves();
            }

            // === PHASE 2: Process Returning Score from Child ===
            if let Some(child_score) = frame.returning_score.take() {
                board.pop()?;

                if frame.maximizing {
                    frame.best = frame.best.max(child_score);
                    frame.alpha = frame.alpha.max(frame.best);
                } else {
                    frame.best = frame.best.min(child_score);
                    frame.beta = frame.beta.min(frame.best);
                }

                // Alpha-beta cutoff: skip the remaining siblings
                if frame.beta <= frame.alpha {
                    self.stats.cutoffs += 1;
                    frame.move_index = frame.moves.len();
                }
            }

            // === PHASE 3: Try Next Move ===
            if frame.move_index < frame.moves.len() {
                let mv = frame.moves[frame.move_index].clone();
                frame.move_index += 1;

                // Collect values before push (avoids borrow checker issues)
                let child_depth = frame.depth - 1;
                let child_alpha = frame.alpha;
                let child_beta = frame.beta;
                let child_maximizing = !frame.maximizing;

                board.push(&mv);
                stack.push(SearchFrame::new(
                    board,
                    mode,
                    child_depth,
                    child_alpha,
                    child_beta,
                    child_maximizing,
                ));
                continue;
            }

            // === PHASE 4: All Moves Processed - Return Result ===
            let score = frame.best;
            let bound = Bound::classify(score, frame.entry_alpha, frame.entry_beta);
            self.cache
                .put(frame.fingerprint.clone(), frame.depth, score, bound);

            if let Some(score) = unwind(&mut stack, score) {
                return Ok(score);
            }
        }

        Err(ChessEngineError::SearchError {
            message: format!(
                "alphabeta: stack became empty unexpectedly at depth {}",
                depth
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{parse_uci_move, Board};
    use crate::constants::{MATE_SCORE, QUEEN_VALUE, SCORE_INFINITY};
    use crate::search::SearchEngine;

    #[test]
    fn test_depth_zero_is_static_eval_on_quiet_position() {
        let mut engine = SearchEngine::default();
        let mut board = Board::default();

        let score = engine
            .search(&mut board, 0, -SCORE_INFINITY, SCORE_INFINITY, true)
            .unwrap();
        assert_eq!(score, 0);
        assert_eq!(engine.stats().nodes, 1);
    }

    #[test]
    fn test_finds_free_queen_one_ply_deep() {
        // White rook on a1 can take an undefended queen on a8
        let mut board = Board::from_fen("q3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mut engine = SearchEngine::default();

        let score = engine
            .search(&mut board, 1, -SCORE_INFINITY, SCORE_INFINITY, true)
            .unwrap();
        assert!(score >= QUEEN_VALUE - 600, "expected the queen capture, got {score}");
    }

    #[test]
    fn test_mate_in_one_is_seen_at_depth_two() {
        // Back-rank mate: Ra8#
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut engine = SearchEngine::default();

        let score = engine
            .search(&mut board, 2, -SCORE_INFINITY, SCORE_INFINITY, true)
            .unwrap();
        assert_eq!(score, MATE_SCORE);
    }

    #[test]
    fn test_search_restores_board() {
        let mut board = Board::default();
        let e4 = parse_uci_move(board.position(), "e2e4").unwrap();
        board.push(&e4);
        let before = board.fen();

        let mut engine = SearchEngine::default();
        engine
            .search(&mut board, 2, -SCORE_INFINITY, SCORE_INFINITY, false)
            .unwrap();

        assert_eq!(board.fen(), before);
        assert_eq!(board.ply(), 1, "search must not pop the caller's moves");
    }

    #[test]
    fn test_cutoffs_happen_with_full_window() {
        let mut engine = SearchEngine::default();
        let mut board = Board::default();

        engine
            .search(&mut board, 2, -SCORE_INFINITY, SCORE_INFINITY, true)
            .unwrap();
        assert!(engine.stats().cutoffs > 0);
    }
}
