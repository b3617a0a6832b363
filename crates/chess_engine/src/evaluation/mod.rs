//! Static position evaluation
//!
//! Scores positions from White's point of view using:
//! - Terminal detection (checkmate, stalemate, insufficient material)
//! - Material count (piece values)
//!
//! There are no positional or mobility terms.
//!
//! ## Module Organization
//!
//! - `material` - Material balance evaluation
//! - `position` - Full position evaluation (terminal states + material)

mod material;
mod position;

pub use material::{evaluate_material, piece_value};
pub use position::evaluate_position;
