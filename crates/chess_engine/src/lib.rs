//! Move selection for a chess-playing agent
//!
//! Given any position, pick a move: from the opening book while the game is
//! young, from an external UCI engine when one is attached, and otherwise
//! from a material-only alpha-beta search with quiescence.
//!
//! Chess rules (move generation, check and mate detection, FEN and UCI) come
//! from `shakmaty`.

pub mod board;
pub mod book;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod hash;
pub mod search;
pub mod selector;

pub use board::Board;
pub use book::OpeningBook;
pub use error::{ChessEngineError, ChessEngineResult};
pub use evaluation::{evaluate_material, evaluate_position};
pub use hash::{Bound, CacheEntry, Fingerprint, FingerprintMode, TranspositionCache};
pub use search::{SearchConfig, SearchEngine, SearchResult, SearchStats};
pub use selector::external::{EngineBudget, ExternalEngine, ExternalEngineError};
pub use selector::{MoveSelector, MoveSource, SelectError, Selection, SelectorConfig};
