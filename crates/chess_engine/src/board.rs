//! Board utilities over the rules provider
//!
//! All chess rules come from `shakmaty`. This module wraps the parts the rest
//! of the engine needs:
//! - FEN decoding and encoding
//! - UCI move text
//! - A push/pop [`Board`] used by the search to walk the game tree

use crate::error::{ChessEngineError, ChessEngineResult};
use crate::hash::{Fingerprint, FingerprintMode};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

/// Decode a FEN string into a position
///
/// # Errors
///
/// Returns [`ChessEngineError::InvalidFen`] when the text is not valid FEN or
/// describes an impossible position.
pub fn parse_fen(fen: &str) -> ChessEngineResult<Chess> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|err: shakmaty::fen::ParseFenError| ChessEngineError::InvalidFen {
            fen: fen.to_string(),
            reason: err.to_string(),
        })?;

    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|err| ChessEngineError::InvalidFen {
            fen: fen.to_string(),
            reason: err.to_string(),
        })
}

/// Encode a position as FEN, including both move clocks
pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Coordinate notation of a move (`e2e4`, `e7e8q`, castling as `e1g1`)
pub fn move_to_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

/// Parse UCI move text and resolve it against the position
///
/// # Errors
///
/// Returns [`ChessEngineError::IllegalMove`] if the text is malformed or the
/// move is not legal in `pos`.
pub fn parse_uci_move(pos: &Chess, uci: &str) -> ChessEngineResult<Move> {
    let illegal = || ChessEngineError::IllegalMove {
        uci: uci.to_string(),
        fen: to_fen(pos),
    };

    let parsed: UciMove = uci.trim().parse().map_err(|_| illegal())?;
    parsed.to_move(pos).map_err(|_| illegal())
}

/// Check a move against the rules provider's legal move list
pub fn is_legal(pos: &Chess, mv: &Move) -> bool {
    pos.legal_moves().contains(mv)
}

/// Play a legal move on a copy of the position
///
/// # Errors
///
/// Returns [`ChessEngineError::IllegalMove`] if `mv` is not legal in `pos`.
pub fn apply_move(pos: &Chess, mv: &Move) -> ChessEngineResult<Chess> {
    if !is_legal(pos, mv) {
        return Err(ChessEngineError::IllegalMove {
            uci: move_to_uci(mv),
            fen: to_fen(pos),
        });
    }

    let mut next = pos.clone();
    next.play_unchecked(mv.clone());
    Ok(next)
}

/// Position with push/pop primitives
///
/// Every `push` saves the current position on a history stack and `pop`
/// restores it, so a subtree walk that pairs each push with a pop leaves the
/// board exactly as it found it.
#[derive(Clone, Debug)]
pub struct Board {
    current: Chess,
    history: Vec<Chess>,
}

impl Board {
    pub fn new(position: Chess) -> Self {
        Self {
            current: position,
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> ChessEngineResult<Self> {
        parse_fen(fen).map(Self::new)
    }

    #[inline]
    pub fn position(&self) -> &Chess {
        &self.current
    }

    pub fn into_position(self) -> Chess {
        self.current
    }

    /// Number of pushes not yet popped
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Play a move the caller obtained from [`Board::legal_moves`] or [`Board::captures`]
    pub fn push(&mut self, mv: &Move) {
        let mut next = self.current.clone();
        next.play_unchecked(mv.clone());
        self.history.push(std::mem::replace(&mut self.current, next));
    }

    /// Undo the most recent push
    ///
    /// # Errors
    ///
    /// Returns [`ChessEngineError::StackUnderflow`] if there is nothing to undo.
    pub fn pop(&mut self) -> ChessEngineResult<()> {
        let previous = self.history.pop().ok_or(ChessEngineError::StackUnderflow)?;
        self.current = previous;
        Ok(())
    }

    /// Legal moves in the rules provider's enumeration order
    pub fn legal_moves(&self) -> Vec<Move> {
        self.current.legal_moves().into_iter().collect()
    }

    /// Legal capturing moves (en passant included)
    pub fn captures(&self) -> Vec<Move> {
        self.current.capture_moves().into_iter().collect()
    }

    /// Checkmate, stalemate or insufficient material
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.current.is_game_over()
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.current.turn()
    }

    pub fn fen(&self) -> String {
        to_fen(&self.current)
    }

    pub fn fingerprint(&self, mode: FingerprintMode) -> Fingerprint {
        Fingerprint::of(&self.current, mode)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Chess::default())
    }
}
