//! # Chess Engine Constants - Evaluation Values & Search Parameters
//!
//! ## Overview
//!
//! This module centralizes the constant values used by the move-selection pipeline: piece valuations
//! (in centipawns), score sentinels for the alpha-beta window, and the defaults for search depth,
//! opening-book horizon and external engine budget.
//!
//! ## Centipawn Valuation System
//!
//! Scores are expressed in **centipawns** (1/100th of a pawn), always from White's point of view:
//! positive favours White, negative favours Black.
//!
//! - **Pawn**: 100
//! - **Knight**: 320
//! - **Bishop**: 330
//! - **Rook**: 500
//! - **Queen**: 900
//! - **King**: 20,000
//!
//! The evaluation is material only. Kings are always on the board, so their value cancels out in any
//! legal position; it is kept in the table so that every role has a weight.
//!
//! ### Checkmate Sentinel
//!
//! A checkmated position scores `±MATE_SCORE`, which is larger than any reachable material balance.
//! `SCORE_INFINITY` bounds the initial alpha-beta window and is strictly larger than `MATE_SCORE`, so a
//! mate score never collides with an open window edge.

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 20_000;

/// Score of a checkmated position (negated when White is the side that lost)
pub const MATE_SCORE: i32 = 99_999;

/// Open edge of the alpha-beta window
pub const SCORE_INFINITY: i32 = 1_000_000;

/// Nominal search depth used by the move selector when nothing else is configured
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

/// Last full-move number for which the opening book is consulted
pub const BOOK_HORIZON: u32 = 10;

/// Time budget handed to the external engine
pub const DEFAULT_ENGINE_MOVETIME_MS: u64 = 500;

/// Strength knob forwarded to the external engine adapter (currently inert)
pub const DEFAULT_ENGINE_ELO: u32 = 1800;

pub const DEFAULT_BOOK_PATH: &str = "assets/openings.pgn";
