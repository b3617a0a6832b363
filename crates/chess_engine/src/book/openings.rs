//! Canonical opening lines used to seed a fresh book file

use super::pgn::{write_pgn, GameRecord, PgnError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningLine {
    pub name: &'static str,
    pub eco: &'static str,
    pub moves: &'static [&'static str],
}

pub const CANONICAL_OPENINGS: [OpeningLine; 5] = [
    OpeningLine {
        name: "Ruy Lopez",
        eco: "C60",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"],
    },
    OpeningLine {
        name: "Sicilian Defense",
        eco: "B50",
        moves: &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6"],
    },
    OpeningLine {
        name: "Queen's Gambit Declined",
        eco: "D30",
        moves: &["d4", "d5", "c4", "e6", "Nc3", "Nf6"],
    },
    OpeningLine {
        name: "Italian Game",
        eco: "C50",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"],
    },
    OpeningLine {
        name: "King's Indian Defense",
        eco: "E60",
        moves: &["d4", "Nf6", "c4", "g6", "Nc3", "Bg7", "e4", "d6"],
    },
];

impl OpeningLine {
    /// The line as a game record with the book's standard tag set
    ///
    /// # Errors
    ///
    /// Returns [`PgnError::InvalidSan`] if a move is not SAN.
    pub fn to_record(&self) -> Result<GameRecord, PgnError> {
        let moves = self
            .moves
            .iter()
            .map(|san| {
                san.parse().map_err(|_| PgnError::InvalidSan {
                    token: (*san).to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let record = GameRecord {
            moves,
            result: Some("*".to_string()),
            ..GameRecord::default()
        };

        Ok(record
            .with_header("Event", "Opening Book")
            .with_header("White", "White")
            .with_header("Black", "Black")
            .with_header("Result", "*")
            .with_header("ECO", self.eco)
            .with_header("Opening", self.name))
    }
}

/// Every canonical line as a game record, in table order
pub fn canonical_corpus() -> Result<Vec<GameRecord>, PgnError> {
    CANONICAL_OPENINGS.iter().map(OpeningLine::to_record).collect()
}

/// The canonical corpus rendered as PGN text
pub fn canonical_pgn() -> Result<String, PgnError> {
    Ok(write_pgn(&canonical_corpus()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::pgn::parse_pgn;

    #[test]
    fn test_corpus_has_five_tagged_lines() {
        let corpus = canonical_corpus().unwrap();
        assert_eq!(corpus.len(), 5);
        for (record, line) in corpus.iter().zip(CANONICAL_OPENINGS.iter()) {
            assert_eq!(record.header("Event"), Some("Opening Book"));
            assert_eq!(record.header("ECO"), Some(line.eco));
            assert_eq!(record.header("Opening"), Some(line.name));
            assert_eq!(record.moves.len(), line.moves.len());
        }
    }

    #[test]
    fn test_rendered_corpus_reads_back() {
        let text = canonical_pgn().unwrap();
        assert!(text.contains("[Opening \"Ruy Lopez\"]"));
        assert!(text.contains("1. d4 Nf6 2. c4 g6 3. Nc3 Bg7 4. e4 d6 *"));

        let records = parse_pgn(&text).unwrap();
        assert_eq!(records, canonical_corpus().unwrap());
    }
}
