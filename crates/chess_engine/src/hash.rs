//! Position fingerprints and transposition table
//!
//! A [`Fingerprint`] keys both the transposition table and the opening book.
//! The table memoizes search scores qualified by the depth they were searched
//! to and by the kind of bound the alpha-beta window produced.

use crate::board::to_fen;
use shakmaty::Chess;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which parts of the position go into a fingerprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FingerprintMode {
    /// Complete FEN, move clocks included
    #[default]
    Full,
    /// Placement, side to move, castling rights and en passant square only
    Strict,
}

impl FromStr for FingerprintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown fingerprint mode {other:?} (expected \"full\" or \"strict\")"
            )),
        }
    }
}

/// Deterministic key identifying a position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(pos: &Chess, mode: FingerprintMode) -> Self {
        let fen = to_fen(pos);
        match mode {
            FingerprintMode::Full => Self(fen),
            FingerprintMode::Strict => {
                Self(fen.split_whitespace().take(4).collect::<Vec<_>>().join(" "))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a cached score relates to the true minimax value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true value is at least the stored score (fail high)
    Lower,
    /// The true value is at most the stored score (fail low)
    Upper,
}

impl Bound {
    /// Classify a node result against the window the node was entered with
    pub fn classify(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub depth: u32,
    pub value: i32,
    pub bound: Bound,
}

impl CacheEntry {
    /// Whether the stored score answers a lookup with this window
    pub fn is_usable(&self, alpha: i32, beta: i32) -> bool {
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.value >= beta,
            Bound::Upper => self.value <= alpha,
        }
    }
}

/// Depth-qualified score cache
///
/// Unbounded unless built with [`TranspositionCache::bounded`], in which case
/// the table is cleared whenever a new key would push it past capacity.
#[derive(Debug, Default)]
pub struct TranspositionCache {
    entries: HashMap<Fingerprint, CacheEntry>,
    capacity: Option<usize>,
    resets: u64,
}

impl TranspositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            capacity: Some(capacity.max(1)),
            resets: 0,
        }
    }

    /// Look up an entry searched at least `min_depth` deep
    pub fn get(&self, fingerprint: &Fingerprint, min_depth: u32) -> Option<CacheEntry> {
        self.entries
            .get(fingerprint)
            .filter(|entry| entry.depth >= min_depth)
            .copied()
    }

    /// Store a score, replacing any previous entry for the same position
    pub fn put(&mut self, fingerprint: Fingerprint, depth: u32, value: i32, bound: Bound) {
        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity && !self.entries.contains_key(&fingerprint) {
                self.resets += 1;
                debug!(
                    "[CACHE] capacity {} reached, clearing table (reset #{})",
                    capacity, self.resets
                );
                self.entries.clear();
            }
        }

        self.entries
            .insert(fingerprint, CacheEntry { depth, value, bound });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// How many times a bounded table has been cleared
    pub fn resets(&self) -> u64 {
        self.resets
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_fen;

    fn key(name: &str) -> Fingerprint {
        Fingerprint(name.to_string())
    }

    #[test]
    fn test_get_respects_min_depth() {
        let mut cache = TranspositionCache::new();
        cache.put(key("a"), 3, 42, Bound::Exact);

        assert_eq!(cache.get(&key("a"), 0).map(|e| e.value), Some(42));
        assert_eq!(cache.get(&key("a"), 3).map(|e| e.value), Some(42));
        assert!(cache.get(&key("a"), 4).is_none(), "deeper request must miss");
        assert!(cache.get(&key("b"), 0).is_none());
    }

    #[test]
    fn test_put_overwrites_same_key() {
        let mut cache = TranspositionCache::new();
        cache.put(key("a"), 1, 10, Bound::Exact);
        cache.put(key("a"), 2, 20, Bound::Lower);

        assert_eq!(cache.len(), 1);
        let entry = cache.get(&key("a"), 2).unwrap();
        assert_eq!(entry.value, 20);
        assert_eq!(entry.bound, Bound::Lower);
    }

    #[test]
    fn test_bound_classification() {
        assert_eq!(Bound::classify(-50, -50, 50), Bound::Upper);
        assert_eq!(Bound::classify(50, -50, 50), Bound::Lower);
        assert_eq!(Bound::classify(0, -50, 50), Bound::Exact);
    }

    #[test]
    fn test_bound_usability() {
        let lower = CacheEntry { depth: 1, value: 100, bound: Bound::Lower };
        assert!(lower.is_usable(0, 100));
        assert!(!lower.is_usable(0, 200));

        let upper = CacheEntry { depth: 1, value: -100, bound: Bound::Upper };
        assert!(upper.is_usable(-100, 0));
        assert!(!upper.is_usable(-200, 0));

        let exact = CacheEntry { depth: 1, value: 7, bound: Bound::Exact };
        assert!(exact.is_usable(100, 200));
    }

    #[test]
    fn test_bounded_cache_resets_when_full() {
        let mut cache = TranspositionCache::bounded(2);
        cache.put(key("a"), 1, 1, Bound::Exact);
        cache.put(key("b"), 1, 2, Bound::Exact);
        // Updating an existing key never triggers a reset
        cache.put(key("b"), 2, 3, Bound::Exact);
        assert_eq!(cache.resets(), 0);

        cache.put(key("c"), 1, 4, Bound::Exact);
        assert_eq!(cache.resets(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("a"), 0).is_none());
        assert!(cache.get(&key("c"), 0).is_some());
    }

    #[test]
    fn test_strict_fingerprint_ignores_move_clocks() {
        let early = parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let late = parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 12 40").unwrap();

        assert_ne!(
            Fingerprint::of(&early, FingerprintMode::Full),
            Fingerprint::of(&late, FingerprintMode::Full)
        );
        assert_eq!(
            Fingerprint::of(&early, FingerprintMode::Strict),
            Fingerprint::of(&late, FingerprintMode::Strict)
        );
        assert_eq!(
            Fingerprint::of(&early, FingerprintMode::Strict).as_str(),
            "4k3/8/8/8/8/8/8/4K2R w K -"
        );
    }

    #[test]
    fn test_fingerprint_mode_from_str() {
        assert_eq!("full".parse::<FingerprintMode>(), Ok(FingerprintMode::Full));
        assert_eq!(" Strict ".parse::<FingerprintMode>(), Ok(FingerprintMode::Strict));
        assert!("fast".parse::<FingerprintMode>().is_err());
    }
}
