use chess_engine::constants::{DEFAULT_BOOK_PATH, DEFAULT_ENGINE_MOVETIME_MS, DEFAULT_SEARCH_DEPTH};
use chess_engine::FingerprintMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chessbot")]
#[command(about = "Pick chess moves from an opening book, Stockfish or a local search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Choose a move for a position and print it with the resulting FEN
    Select {
        #[arg(short, long)]
        fen: String,

        /// Local search depth in plies
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_DEPTH)]
        depth: u32,

        /// Opening book in PGN
        #[arg(short, long, default_value = DEFAULT_BOOK_PATH)]
        book: PathBuf,

        /// UCI engine binary; without it the local search is the fallback
        #[arg(short, long)]
        stockfish: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_ENGINE_MOVETIME_MS)]
        movetime: u64,

        /// full or strict
        #[arg(long, default_value = "full")]
        fingerprint: FingerprintMode,
    },

    /// Print the static evaluation of a position
    Eval {
        #[arg(short, long)]
        fen: String,
    },

    /// Opening book tools
    Book {
        #[command(subcommand)]
        action: BookAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookAction {
    /// Write the built-in opening lines as PGN
    Generate {
        #[arg(short, long, default_value = DEFAULT_BOOK_PATH)]
        out: PathBuf,
    },

    /// Look up the book move for a position
    Lookup {
        #[arg(short, long)]
        fen: String,

        #[arg(short, long, default_value = DEFAULT_BOOK_PATH)]
        book: PathBuf,
    },
}
