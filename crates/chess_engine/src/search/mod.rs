//! Minimax search with alpha-beta pruning
//!
//! This module implements the local fallback search using:
//! - Minimax with an explicit maximizing/minimizing side (ITERATIVE - no recursion)
//! - Alpha-beta pruning on the running [alpha, beta] window
//! - Quiescence extension over captures to soften the horizon effect
//! - A depth-qualified, bound-tagged transposition table owned by the engine
//!
//! Moves are searched in the rules provider's order; there is no move ordering
//! and no iterative deepening, so results are reproducible for a given
//! position, depth and cache state.
//!
//! ## Module Organization
//!
//! - `alphabeta` - Core alpha-beta search algorithm
//! - `quiescence` - Quiescence search to avoid horizon effect
//! - `root` - Root move selection (`best_move`)

mod alphabeta;
mod quiescence;
mod root;

use crate::board::move_to_uci;
use crate::constants::DEFAULT_SEARCH_DEPTH;
use crate::hash::{FingerprintMode, TranspositionCache};
use shakmaty::Move;

/// Search tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u32,
    pub fingerprint: FingerprintMode,
    /// Entry limit for the transposition table; `None` grows without bound
    pub cache_capacity: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            fingerprint: FingerprintMode::Full,
            cache_capacity: None,
        }
    }
}

/// Search statistics, reset at the start of every [`SearchEngine::best_move`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub evaluations: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
}

/// Best root move and its score from White's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub mv: Move,
    pub score: i32,
}

impl SearchResult {
    pub fn uci(&self) -> String {
        move_to_uci(&self.mv)
    }
}

/// Owner of the transposition table and the search counters
#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    cache: TranspositionCache,
    stats: SearchStats,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let cache = match config.cache_capacity {
            Some(capacity) => TranspositionCache::bounded(capacity),
            None => TranspositionCache::new(),
        };

        Self {
            config,
            cache,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// One simulated call frame on an explicit search stack
trait Frame {
    fn receive(&mut self, score: i32);
}

/// Pop the finished frame and hand its score to the parent frame
///
/// Returns the score when the popped frame was the root.
fn unwind<F: Frame>(stack: &mut Vec<F>, score: i32) -> Option<i32> {
    stack.pop();
    match stack.last_mut() {
        Some(parent) => {
            parent.receive(score);
            None
        }
        None => Some(score),
    }
}
