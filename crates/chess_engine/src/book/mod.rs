//! Opening book
//!
//! A fingerprint → move table built once from a PGN corpus. Each record is
//! replayed from its start position; the first record to reach a position
//! decides the book move for it.

pub mod openings;
pub mod pgn;

use crate::board::{apply_move, move_to_uci};
use crate::hash::{Fingerprint, FingerprintMode};
use pgn::{parse_pgn, GameRecord};
use shakmaty::{Chess, Move};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    moves: HashMap<Fingerprint, Move>,
    mode: FingerprintMode,
    lines: usize,
}

impl OpeningBook {
    pub fn empty(mode: FingerprintMode) -> Self {
        Self {
            moves: HashMap::new(),
            mode,
            lines: 0,
        }
    }

    /// Load a book from a PGN file
    ///
    /// A missing, unreadable or malformed file yields an empty book.
    pub fn load(path: impl AsRef<Path>, mode: FingerprintMode) -> Self {
        let path = path.as_ref();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!("[BOOK] cannot read {}: {}; using an empty book", path.display(), err);
                return Self::empty(mode);
            }
        };

        match Self::from_pgn(&text, mode) {
            Ok(book) => {
                info!(
                    "[BOOK] loaded {} positions from {} lines in {}",
                    book.len(),
                    book.lines(),
                    path.display()
                );
                book
            }
            Err(err) => {
                warn!("[BOOK] cannot parse {}: {}; using an empty book", path.display(), err);
                Self::empty(mode)
            }
        }
    }

    /// # Errors
    ///
    /// Returns the PGN error when the text is not a readable corpus.
    pub fn from_pgn(text: &str, mode: FingerprintMode) -> Result<Self, pgn::PgnError> {
        Ok(Self::from_records(&parse_pgn(text)?, mode))
    }

    pub fn from_records(records: &[GameRecord], mode: FingerprintMode) -> Self {
        let mut book = Self::empty(mode);
        for record in records {
            book.add_line(record);
        }
        book
    }

    fn add_line(&mut self, record: &GameRecord) {
        let name = record.header("Opening").unwrap_or("unnamed line");
        let mut pos = match record.start_position() {
            Ok(pos) => pos,
            Err(err) => {
                warn!("[BOOK] skipping {}: {}", name, err);
                return;
            }
        };
        self.lines += 1;

        for san in &record.moves {
            let mv = match san.san.to_move(&pos) {
                Ok(mv) => mv,
                Err(_) => {
                    warn!("[BOOK] {}: {} is illegal here, line stops", name, san);
                    return;
                }
            };

            self.moves
                .entry(Fingerprint::of(&pos, self.mode))
                .or_insert_with(|| mv.clone());

            pos = match apply_move(&pos, &mv) {
                Ok(next) => next,
                Err(err) => {
                    warn!("[BOOK] {}: {}", name, err);
                    return;
                }
            };
        }
    }

    /// Book move for the position, if any
    pub fn lookup(&self, pos: &Chess) -> Option<Move> {
        let mv = self.moves.get(&Fingerprint::of(pos, self.mode)).cloned();
        if let Some(mv) = &mv {
            debug!("[BOOK] hit {}", move_to_uci(mv));
        }
        mv
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Number of records replayed into the table
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn mode(&self) -> FingerprintMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{parse_fen, parse_uci_move};

    const DIVERGING: &str = "[Opening \"First\"]\n\n1. e4 e5 2. Nf3 Nc6 *\n\n\
                             [Opening \"Second\"]\n\n1. e4 c5 2. Nf3 d6 *\n";

    #[test]
    fn test_first_line_wins_shared_prefix() {
        let book = OpeningBook::from_pgn(DIVERGING, FingerprintMode::Full).unwrap();
        assert_eq!(book.lines(), 2);

        let start = Chess::default();
        assert_eq!(book.lookup(&start).map(|mv| move_to_uci(&mv)).as_deref(), Some("e2e4"));

        let after_e4 = apply_move(&start, &parse_uci_move(&start, "e2e4").unwrap()).unwrap();
        assert_eq!(book.lookup(&after_e4).map(|mv| move_to_uci(&mv)).as_deref(), Some("e7e5"));
    }

    #[test]
    fn test_later_line_still_adds_new_positions() {
        let book = OpeningBook::from_pgn(DIVERGING, FingerprintMode::Full).unwrap();

        let after_c5 = parse_fen("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2").unwrap();
        assert_eq!(book.lookup(&after_c5).map(|mv| move_to_uci(&mv)).as_deref(), Some("g1f3"));
        // start, e4, e5-branch x2, c5-branch x2
        assert_eq!(book.len(), 6);
    }

    #[test]
    fn test_illegal_token_stops_only_that_line() {
        let text = "1. e4 e5 2. Ke3 Nc6 *\n\n1. d4 d5 *\n";
        let book = OpeningBook::from_pgn(text, FingerprintMode::Full).unwrap();

        // e4, e5 from the first line; d4 collides with the start; d5 is new
        assert_eq!(book.len(), 3);
        assert_eq!(book.lines(), 2);
    }

    #[test]
    fn test_missing_file_gives_empty_book() {
        let book = OpeningBook::load("/nonexistent/openings.pgn", FingerprintMode::Full);
        assert!(book.is_empty());
        assert!(book.lookup(&Chess::default()).is_none());
    }

    #[test]
    fn test_canonical_corpus_builds() {
        let book = OpeningBook::from_records(
            &openings::canonical_corpus().unwrap(),
            FingerprintMode::Strict,
        );
        assert_eq!(book.lines(), 5);
        assert_eq!(book.lookup(&Chess::default()).map(|mv| move_to_uci(&mv)).as_deref(), Some("e2e4"));
    }

    #[test]
    fn test_fen_header_sets_start_position() {
        let text = "[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n\n1. e4 *\n";
        let book = OpeningBook::from_pgn(text, FingerprintMode::Full).unwrap();
        let pos = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(book.lookup(&pos).map(|mv| move_to_uci(&mv)).as_deref(), Some("e2e4"));
    }
}
