//! Portable Game Notation reader and writer
//!
//! Only what an opening corpus needs: tag pairs and the main line of the
//! move text. Comments, NAGs, escape lines and variations are skipped.

use crate::board::parse_fen;
use crate::error::ChessEngineResult;
use shakmaty::san::SanPlus;
use shakmaty::Chess;
use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PgnError {
    #[error("Malformed tag pair near {context:?}")]
    MalformedTag { context: String },

    #[error("Unterminated comment")]
    UnterminatedComment,

    #[error("Unterminated variation")]
    UnterminatedVariation,

    #[error("Invalid SAN token {token:?}")]
    InvalidSan { token: String },
}

/// One game: tag pairs in file order and its main line in SAN
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub headers: Vec<(String, String)>,
    pub moves: Vec<SanPlus>,
    pub result: Option<String>,
}

impl GameRecord {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match self.headers.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        self
    }

    /// Starting position: the `FEN` tag when present, otherwise the standard setup
    pub fn start_position(&self) -> ChessEngineResult<Chess> {
        match self.header("FEN") {
            Some(fen) => parse_fen(fen),
            None => Ok(Chess::default()),
        }
    }

    fn is_blank(&self) -> bool {
        self.headers.is_empty() && self.moves.is_empty() && self.result.is_none()
    }
}

/// Parse every game in a PGN text
///
/// # Errors
///
/// Returns a [`PgnError`] for malformed tags, unterminated comments or
/// variations, and tokens that are not SAN.
pub fn parse_pgn(text: &str) -> Result<Vec<GameRecord>, PgnError> {
    let mut games = Vec::new();
    let mut current = GameRecord::default();
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(&c) = chars.peek() {
        if c == '\n' {
            chars.next();
            at_line_start = true;
            continue;
        }
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let line_start = at_line_start;
        at_line_start = false;

        match c {
            '%' if line_start => skip_line(&mut chars),
            ';' => skip_line(&mut chars),
            '{' => skip_comment(&mut chars)?,
            '(' => skip_variation(&mut chars)?,
            '[' => {
                // A tag after move text starts the next game
                if !current.moves.is_empty() || current.result.is_some() {
                    games.push(std::mem::take(&mut current));
                }
                let (name, value) = read_tag(&mut chars)?;
                current.headers.push((name, value));
            }
            '$' => {
                chars.next();
                while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    chars.next();
                }
            }
            _ => {
                let token = read_token(&mut chars);
                if RESULT_TOKENS.contains(&token.as_str()) {
                    current.result = Some(token);
                    games.push(std::mem::take(&mut current));
                    continue;
                }
                if let Some(san) = san_part(&token) {
                    let parsed = normalize_castling(san)
                        .parse::<SanPlus>()
                        .map_err(|_| PgnError::InvalidSan { token: token.clone() })?;
                    current.moves.push(parsed);
                }
            }
        }
    }

    if !current.is_blank() {
        games.push(current);
    }

    Ok(games)
}

/// Render games as PGN, one blank line between them
pub fn write_pgn(games: &[GameRecord]) -> String {
    let mut out = String::new();

    for game in games {
        for (name, value) in &game.headers {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            let _ = writeln!(out, "[{name} \"{escaped}\"]");
        }
        if !game.headers.is_empty() {
            out.push('\n');
        }

        let mut tokens = Vec::with_capacity(game.moves.len() * 3 / 2 + 1);
        for (ply, san) in game.moves.iter().enumerate() {
            if ply % 2 == 0 {
                tokens.push(format!("{}.", ply / 2 + 1));
            }
            tokens.push(san.to_string());
        }
        let result = game
            .result
            .as_deref()
            .or_else(|| game.header("Result"))
            .unwrap_or("*");
        tokens.push(result.to_string());

        out.push_str(&tokens.join(" "));
        out.push_str("\n\n");
    }

    out
}

fn skip_line(chars: &mut Peekable<Chars<'_>>) {
    for c in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

fn skip_comment(chars: &mut Peekable<Chars<'_>>) -> Result<(), PgnError> {
    chars.next();
    for c in chars.by_ref() {
        if c == '}' {
            return Ok(());
        }
    }
    Err(PgnError::UnterminatedComment)
}

fn skip_variation(chars: &mut Peekable<Chars<'_>>) -> Result<(), PgnError> {
    chars.next();
    let mut depth = 1usize;

    while let Some(&c) = chars.peek() {
        match c {
            '{' => skip_comment(chars)?,
            ';' => skip_line(chars),
            '(' => {
                depth += 1;
                chars.next();
            }
            ')' => {
                depth -= 1;
                chars.next();
                if depth == 0 {
                    return Ok(());
                }
            }
            _ => {
                chars.next();
            }
        }
    }

    Err(PgnError::UnterminatedVariation)
}

fn read_tag(chars: &mut Peekable<Chars<'_>>) -> Result<(String, String), PgnError> {
    chars.next();
    let mut raw = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in chars.by_ref() {
        if in_quotes {
            raw.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            ']' => return split_tag(&raw),
            '"' => {
                in_quotes = true;
                raw.push(c);
            }
            '\n' => break,
            _ => raw.push(c),
        }
    }

    Err(PgnError::MalformedTag { context: raw })
}

fn split_tag(raw: &str) -> Result<(String, String), PgnError> {
    let malformed = || PgnError::MalformedTag {
        context: raw.to_string(),
    };

    let raw = raw.trim();
    let (name, rest) = raw.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let quoted = rest.trim();
    if name.is_empty() || quoted.len() < 2 || !quoted.starts_with('"') || !quoted.ends_with('"') {
        return Err(malformed());
    }

    let value = quoted[1..quoted.len() - 1]
        .replace("\\\"", "\"")
        .replace("\\\\", "\\");
    Ok((name.to_string(), value))
}

fn read_token(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut token = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || matches!(c, '{' | '}' | '(' | ')' | '[' | ']' | ';' | '$') {
            break;
        }
        token.push(c);
        chars.next();
    }
    if token.is_empty() {
        // Stray closing bracket or brace
        chars.next();
    }
    token
}

/// Strip move numbers and annotation glyphs, leaving the SAN (if any)
fn san_part(token: &str) -> Option<&str> {
    if token.starts_with("0-0") {
        return Some(token.trim_end_matches(['!', '?']));
    }
    let without_number = token.trim_start_matches(|c: char| c.is_ascii_digit());
    let san = if without_number.len() != token.len() {
        without_number.trim_start_matches('.')
    } else {
        token
    };
    let san = san.trim_end_matches(['!', '?']);
    (!san.is_empty()).then_some(san)
}

fn normalize_castling(san: &str) -> String {
    if san.starts_with("0-0") {
        san.replace('0', "O")
    } else {
        san.to_string()
    }
}
