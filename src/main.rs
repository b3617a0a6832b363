mod cli;

use anyhow::Context;
use chess_engine::board::{move_to_uci, parse_fen};
use chess_engine::book::openings::canonical_pgn;
use chess_engine::{
    evaluate_material, evaluate_position, EngineBudget, FingerprintMode, MoveSelector, OpeningBook,
    SearchConfig, SearchEngine, SelectorConfig,
};
use clap::Parser;
use cli::{BookAction, Cli, Command};
use shakmaty::Position;
use std::path::Path;
use std::time::Duration;
use stockfish_ai::StockfishEngine;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Select {
            fen,
            depth,
            book,
            stockfish,
            movetime,
            fingerprint,
        } => {
            let position = parse_fen(&fen)?;
            let search = SearchEngine::new(SearchConfig {
                depth,
                fingerprint,
                cache_capacity: None,
            });
            let config = SelectorConfig {
                budget: EngineBudget {
                    movetime: Duration::from_millis(movetime),
                    ..EngineBudget::default()
                },
                ..SelectorConfig::default()
            };

            let mut selector =
                MoveSelector::new(config, OpeningBook::load(&book, fingerprint), search);
            if let Some(path) = stockfish {
                selector = selector.with_engine(Box::new(StockfishEngine::new(path)));
            }

            let selection = selector.select_and_apply(&position).await?;
            println!("move: {}", selection.uci());
            println!("source: {}", selection.source);
            if let Some(score) = selection.score {
                println!("score: {}", score);
            }
            println!("fen: {}", selection.fen());
        }

        Command::Eval { fen } => {
            let position = parse_fen(&fen)?;
            println!("evaluation: {}", evaluate_position(&position));
            println!("material: {}", evaluate_material(&position));
            if position.is_checkmate() {
                println!("status: checkmate");
            } else if position.is_stalemate() {
                println!("status: stalemate");
            } else if position.is_insufficient_material() {
                println!("status: insufficient material");
            }
        }

        Command::Book { action } => match action {
            BookAction::Generate { out } => write_book(&out)?,
            BookAction::Lookup { fen, book } => {
                let position = parse_fen(&fen)?;
                let book = OpeningBook::load(&book, FingerprintMode::Full);
                match book.lookup(&position) {
                    Some(mv) => println!("{}", move_to_uci(&mv)),
                    None => println!("(none)"),
                }
            }
        },
    }

    Ok(())
}

fn write_book(out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(out, canonical_pgn()?).with_context(|| format!("cannot write {}", out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}
