//! Full position evaluation
//!
//! Terminal states first, then material.

use super::material::evaluate_material;
use crate::constants::MATE_SCORE;
use shakmaty::{Chess, Color, Position};

/// Evaluate a position from White's point of view
///
/// A checkmated side to move gets the mate sentinel against it; stalemate and
/// insufficient material are dead draws.
pub fn evaluate_position(pos: &Chess) -> i32 {
    if pos.is_checkmate() {
        return if pos.turn() == Color::White {
            -MATE_SCORE
        } else {
            MATE_SCORE
        };
    }

    if pos.is_stalemate() || pos.is_insufficient_material() {
        return 0;
    }

    evaluate_material(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{apply_move, parse_fen, parse_uci_move};

    fn play_line(moves: &[&str]) -> Chess {
        moves.iter().fold(Chess::default(), |pos, uci| {
            let mv = parse_uci_move(&pos, uci).expect("line should be legal");
            apply_move(&pos, &mv).unwrap()
        })
    }

    #[test]
    fn test_fools_mate_is_worst_score_for_white() {
        let pos = play_line(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(pos.is_checkmate());
        assert_eq!(pos.turn(), Color::White);
        assert_eq!(evaluate_position(&pos), -MATE_SCORE);
    }

    #[test]
    fn test_scholars_mate_is_best_score_for_white() {
        let pos = parse_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
            .unwrap();
        assert_eq!(evaluate_position(&pos), MATE_SCORE);
    }

    #[test]
    fn test_bare_kings_are_a_draw() {
        let pos = parse_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate_position(&pos), 0);
    }

    #[test]
    fn test_insufficient_material_ignores_extra_bishop() {
        let pos = parse_fen("8/8/8/4k3/8/8/8/2B1K3 w - - 0 1").unwrap();
        assert_eq!(evaluate_position(&pos), 0);
    }

    #[test]
    fn test_stalemate_scores_zero_despite_material() {
        let pos = parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(pos.is_stalemate());
        assert_eq!(evaluate_position(&pos), 0);
    }

    #[test]
    fn test_ongoing_position_is_material() {
        // Rook off the e-file so Black is not in check with White to move
        let pos = parse_fen("4k3/8/8/8/8/8/R7/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate_position(&pos), crate::constants::ROOK_VALUE);
    }
}
