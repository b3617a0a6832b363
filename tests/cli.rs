use chess_engine::book::openings::canonical_pgn;
use std::path::PathBuf;
use std::process::{Command, Output};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn chessbot(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chessbot"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "chessbot failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn shipped_book_matches_the_built_in_lines() {
    let shipped = std::fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/openings.pgn"),
    )
    .unwrap();
    assert_eq!(shipped, canonical_pgn().unwrap());
}

#[test]
fn generate_then_look_up() {
    let out = std::env::temp_dir().join(format!("chessbot_book_{}.pgn", std::process::id()));
    let out_arg = out.to_str().unwrap();

    stdout(&chessbot(&["book", "generate", "--out", out_arg]));
    let found = stdout(&chessbot(&["book", "lookup", "--fen", START_FEN, "--book", out_arg]));
    assert_eq!(found.trim(), "e2e4");

    let _ = std::fs::remove_file(&out);
}

#[test]
fn select_from_the_default_book() {
    let text = stdout(&chessbot(&["select", "--fen", START_FEN]));
    assert!(text.contains("move: e2e4"), "{text}");
    assert!(text.contains("source: book"), "{text}");
}

#[test]
fn select_falls_back_to_search_without_a_book() {
    let text = stdout(&chessbot(&[
        "select",
        "--fen",
        "q3k3/8/8/8/8/8/8/R3K3 w - - 0 1",
        "--depth",
        "2",
        "--book",
        "/nonexistent/openings.pgn",
    ]));
    assert!(text.contains("move: a1a8"), "{text}");
    assert!(text.contains("source: search"), "{text}");
}

#[test]
fn eval_reports_checkmate() {
    let text = stdout(&chessbot(&[
        "eval",
        "--fen",
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
    ]));
    assert!(text.contains("evaluation: -99999"), "{text}");
    assert!(text.contains("status: checkmate"), "{text}");
}

#[test]
fn invalid_fen_fails() {
    let output = chessbot(&["eval", "--fen", "not a fen"]);
    assert!(!output.status.success());
}
