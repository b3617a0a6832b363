//! Server settings from the environment

use chess_engine::constants::{
    BOOK_HORIZON, DEFAULT_BOOK_PATH, DEFAULT_ENGINE_ELO, DEFAULT_ENGINE_MOVETIME_MS,
    DEFAULT_SEARCH_DEPTH,
};
use chess_engine::{
    EngineBudget, FingerprintMode, MoveSelector, OpeningBook, SearchConfig, SearchEngine,
    SelectorConfig,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use stockfish_ai::StockfishEngine;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{key}={value:?} is invalid: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub book_path: PathBuf,
    /// No engine is attached when unset
    pub stockfish_path: Option<PathBuf>,
    pub search_depth: u32,
    pub movetime: Duration,
    pub elo: Option<u32>,
    pub book_horizon: u32,
    pub fingerprint: FingerprintMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            book_path: PathBuf::from(DEFAULT_BOOK_PATH),
            stockfish_path: None,
            search_depth: DEFAULT_SEARCH_DEPTH,
            movetime: Duration::from_millis(DEFAULT_ENGINE_MOVETIME_MS),
            elo: Some(DEFAULT_ENGINE_ELO),
            book_horizon: BOOK_HORIZON,
            fingerprint: FingerprintMode::Full,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("PORT") {
            config.port = parse("PORT", &value)?;
        }
        if let Some(value) = get("BOOK_PATH") {
            config.book_path = PathBuf::from(value);
        }
        if let Some(value) = get("STOCKFISH_PATH") {
            config.stockfish_path = Some(PathBuf::from(value));
        }
        if let Some(value) = get("SEARCH_DEPTH") {
            config.search_depth = parse("SEARCH_DEPTH", &value)?;
        }
        if let Some(value) = get("ENGINE_MOVETIME_MS") {
            config.movetime = Duration::from_millis(parse("ENGINE_MOVETIME_MS", &value)?);
        }
        if let Some(value) = get("ENGINE_ELO") {
            config.elo = Some(parse("ENGINE_ELO", &value)?);
        }
        if let Some(value) = get("BOOK_HORIZON") {
            config.book_horizon = parse("BOOK_HORIZON", &value)?;
        }
        if let Some(value) = get("FINGERPRINT_MODE") {
            config.fingerprint = value.parse().map_err(|reason| ConfigError {
                key: "FINGERPRINT_MODE",
                value: value.clone(),
                reason,
            })?;
        }

        Ok(config)
    }

    pub fn build_selector(&self) -> MoveSelector {
        let book = OpeningBook::load(&self.book_path, self.fingerprint);
        let search = SearchEngine::new(SearchConfig {
            depth: self.search_depth,
            fingerprint: self.fingerprint,
            cache_capacity: None,
        });
        let selector_config = SelectorConfig {
            book_horizon: self.book_horizon,
            budget: EngineBudget {
                movetime: self.movetime,
                elo: self.elo,
            },
        };

        let selector = MoveSelector::new(selector_config, book, search);
        match &self.stockfish_path {
            Some(path) => {
                if !path.exists() {
                    warn!("STOCKFISH_PATH {} does not exist, calls will fall back to search", path.display());
                }
                info!("external engine: {}", path.display());
                selector.with_engine(Box::new(StockfishEngine::new(path)))
            }
            None => {
                info!("no external engine configured");
                selector
            }
        }
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}
