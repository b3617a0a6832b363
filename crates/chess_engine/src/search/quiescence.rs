//! Quiescence search to avoid horizon effect
//!
//! Once the nominal depth runs out, only captures are searched until the
//! position is quiet or the window closes. The static evaluation is the
//! "stand pat" baseline: the side to move may always decline to capture.
//!
//! Like the main search, the walk is FULLY ITERATIVE over explicit frames.

use super::{unwind, Frame, SearchEngine};
use crate::board::Board;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::evaluation::evaluate_position;
use shakmaty::Move;

/// Stack frame for iterative quiescence search
struct QuiescenceFrame {
    alpha: i32,
    beta: i32,
    maximizing: bool,
    expanded: bool,
    captures: Vec<Move>,
    capture_index: usize,
    returning_score: Option<i32>,
}

impl QuiescenceFrame {
    fn new(alpha: i32, beta: i32, maximizing: bool) -> Self {
        Self {
            alpha,
            beta,
            maximizing,
            expanded: false,
            captures: Vec::new(),
            capture_index: 0,
            returning_score: None,
        }
    }
}

impl Frame for QuiescenceFrame {
    fn receive(&mut self, score: i32) {
        self.returning_score = Some(score);
    }
}

impl SearchEngine {
    /// Fail-hard capture search
    ///
    /// Returns `alpha` for a maximizing node and `beta` for a minimizing one,
    /// clamped to the window it was called with.
    ///
    /// # Errors
    ///
    /// Returns an error if the search algorithm encounters stack corruption.
    pub(crate) fn quiescence_search(
        &mut self,
        board: &mut Board,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> ChessEngineResult<i32> {
        let mut stack = vec![QuiescenceFrame::new(alpha, beta, maximizing)];

        while let Some(frame) = stack.last_mut() {
            // === PHASE 1: Frame Initialization (first visit) ===
            if !frame.expanded {
                frame.expanded = true;
                self.stats.quiescence_nodes += 1;
                self.stats.evaluations += 1;

                let stand_pat = evaluate_position(board.position());

                if frame.maximizing {
                    if stand_pat >= frame.beta {
                        let beta = frame.beta;
                        if let Some(score) = unwind(&mut stack, beta) {
                            return Ok(score);
                        }
                        continue;
                    }
                    frame.alpha = frame.alpha.max(stand_pat);
                } else {
                    if stand_pat <= frame.alpha {
                        let alpha = frame.alpha;
                        if let Some(score) = unwind(&mut stack, alpha) {
                            return Ok(score);
                        }
                        continue;
                    }
                    frame.beta = frame.beta.min(stand_pat);
                }

                // Generate capture moves only
                frame.captures = board.captures();
            }

            // === PHASE 2: Process Child Return ===
            if let Some(child_score) = frame.returning_score.take() {
                board.pop()?;

                if frame.maximizing {
                    if child_score >= frame.beta {
                        let beta = frame.beta;
                        if let Some(score) = unwind(&mut stack, beta) {
                            return Ok(score);
                        }
                        continue;
                    }
                    frame.alpha = frame.alpha.max(child_score);
                } else {
                    if child_score <= frame.alpha {
                        let alpha = frame.alpha;
                        if let Some(score) = unwind(&mut stack, alpha) {
                            return Ok(score);
                        }
                        continue;
                    }
                    frame.beta = frame.beta.min(child_score);
                }
            }

            // === PHASE 3: Try Next Capture ===
            if frame.capture_index < frame.captures.len() {
                let mv = frame.captures[frame.capture_index].clone();
                frame.capture_index += 1;

                let child = QuiescenceFrame::new(frame.alpha, frame.beta, !frame.maximizing);
                board.push(&mv);
                stack.push(child);
                continue;
            }

            // === PHASE 4: No captures left - return the bound ===
            let score = if frame.maximizing {
                frame.alpha
            } else {
                frame.beta
            };
            if let Some(score) = unwind(&mut stack, score) {
                return Ok(score);
            }
        }

        Err(ChessEngineError::SearchError {
            message: "quiescence_search: stack became empty unexpectedly".to_string(),
        })
    }
}
