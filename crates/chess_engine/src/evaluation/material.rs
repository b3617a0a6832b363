//! Material evaluation
//!
//! Evaluates the material balance of a position by counting piece values.

use crate::constants::*;
use shakmaty::{Chess, Color, Position, Role};

/// Centipawn value of a role
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

/// Evaluate material balance
pub fn evaluate_material(pos: &Chess) -> i32 {
    let board = pos.board();
    let white = board.by_color(Color::White);
    let black = board.by_color(Color::Black);

    Role::ALL
        .iter()
        .map(|&role| {
            let pieces = board.by_role(role);
            let balance = (pieces & white).count() as i32 - (pieces & black).count() as i32;
            balance * piece_value(role)
        })
        .sum()
}
