mod common;

use std::collections::HashMap;

use board3d::coord::{Coord, Square, validate_ordinary_square, validate_spare_square, validate_square};
use board3d::error::BoardError;
use board3d::fen::{START_FEN, parse_fen, validate_fen};
use board3d::piece::validate_piece_code;
use board3d::position::{BoardMove, Position, PositionSource, validate_move, validate_position};
use common::*;
use pretty_assertions::assert_eq;


fn string_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect()
}


#[test]
fn fen_round_trip() {
    for fen in [
        START_FEN,
        "8/8/8/8/8/8/8/8",
        "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR",
        "4k3/8/8/8/8/8/8/R3K2R",
        "7K/8/8/8/8/8/8/k7",
    ] {
        assert_eq!(parse_fen(fen).unwrap().to_fen(), fen);
    }
}

#[test]
fn fen_metadata_is_ignored() {
    let position = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
    assert_eq!(position.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
}

#[test]
fn fen_is_canonical() {
    // Adjacent empty runs are merged on output.
    let position = parse_fen("44/8/8/8/8/8/8/8").unwrap();
    assert!(position.is_empty());
    assert_eq!(position.to_fen(), "8/8/8/8/8/8/8/8");
}

#[test]
fn fen_validation() {
    assert!(validate_fen(START_FEN));
    assert!(validate_fen("8/8/8/8/8/8/8/8"));
    assert!(!validate_fen(""));
    assert!(!validate_fen("8/8/8/8/8/8/8"));
    assert!(!validate_fen("8/8/8/8/8/8/8/8/8"));
    assert!(!validate_fen("9/8/8/8/8/8/8/8"));
    assert!(!validate_fen("ppppppppp/8/8/8/8/8/8/8"));
    assert!(!validate_fen("rnbqkbnx/8/8/8/8/8/8/8"));
    assert!(!validate_fen("8//8/8/8/8/8/8"));
    assert!(matches!(parse_fen("start"), Err(BoardError::InvalidFen(_))));
}

#[test]
fn start_position() {
    let start = Position::start();
    assert_eq!(start.len(), 32);
    assert_eq!(start.get(Coord::E1), Some(piece!(wK)));
    assert_eq!(start.get(Coord::D8), Some(piece!(bQ)));
    assert_eq!(start.get(Coord::E4), None);
}

#[test]
fn parse_board_matches_fen() {
    let position = parse_board(
        "
        . . . . k . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        R . . . K . . R
    ",
    )
    .unwrap();
    assert_eq!(position, parse_fen("4k3/8/8/8/8/8/8/R3K2R").unwrap());
}

#[test]
fn square_validation() {
    assert!(validate_ordinary_square("a1"));
    assert!(validate_ordinary_square("h8"));
    assert!(!validate_ordinary_square("i1"));
    assert!(!validate_ordinary_square("a9"));
    assert!(!validate_ordinary_square("A1"));
    assert!(!validate_ordinary_square("a10"));
    assert!(validate_spare_square("sw1"));
    assert!(validate_spare_square("sb6"));
    assert!(!validate_spare_square("sw7"));
    assert!(!validate_spare_square("sw0"));
    assert!(!validate_spare_square("sx1"));
    assert!(validate_square("e4"));
    assert!(validate_square("sb3"));
    assert!(!validate_square(""));
}

#[test]
fn piece_code_validation() {
    for code in ["wK", "wQ", "wR", "wB", "wN", "wP", "bK", "bP"] {
        assert!(validate_piece_code(code), "{code}");
    }
    for code in ["", "w", "wX", "xK", "WK", "wk", "wKK"] {
        assert!(!validate_piece_code(code), "{code}");
    }
}

#[test]
fn move_validation() {
    assert!(validate_move("e2-e4"));
    assert!(validate_move("sw6-e4"));
    assert!(!validate_move("e2e4"));
    assert!(!validate_move("e2-e9"));
    assert!(!validate_move(" e2-e4"));
    assert_eq!(
        BoardMove::from_notation("a1-h8"),
        Some(BoardMove { source: Coord::A1.into(), destination: Coord::H8.into() })
    );
}

#[test]
fn position_object_validation() {
    assert!(validate_position(&string_map(&[])));
    assert!(validate_position(&string_map(&[("e4", "wP"), ("sw1", "wK")])));
    assert!(!validate_position(&string_map(&[("e9", "wP")])));
    assert!(!validate_position(&string_map(&[("z9", "wP")])));
    assert!(!validate_position(&string_map(&[("e4", "wX")])));
}

#[test]
fn position_sources() {
    assert_eq!(PositionSource::parse("start").unwrap(), PositionSource::Start);
    assert_eq!(
        PositionSource::parse(START_FEN).unwrap().resolve().unwrap(),
        Position::start()
    );
    let from_json = PositionSource::parse(r#"{"e4": "wP", "d5": "bP"}"#).unwrap().resolve().unwrap();
    assert_eq!(from_json, pos! { E4 => wP, D5 => bP });
    assert!(matches!(
        PositionSource::parse(r#"{"e4": "wZ"}"#),
        Err(BoardError::InvalidPosition(_))
    ));
    assert!(matches!(PositionSource::parse("nonsense"), Err(BoardError::InvalidPosition(_))));
}

#[test]
fn moves_apply_simultaneously() {
    let position = pos! { A1 => wR, H1 => wR };
    let moves = ["a1-h1", "h1-a1"].map(|m| BoardMove::from_notation(m).unwrap());
    assert_eq!(position.with_moves(&moves), position);

    let moves = ["e2-e4", "d7-d5"].map(|m| BoardMove::from_notation(m).unwrap());
    let moved = Position::start().with_moves(&moves);
    assert_eq!(moved.to_fen(), "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR");
}

#[test]
fn last_move_from_a_square_wins() {
    let moves = ["e2-e3", "g1-f3", "e2-e4"].map(|m| BoardMove::from_notation(m).unwrap());
    let moved = Position::start().with_moves(&moves);
    assert_eq!(moved.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/5N2/PPPP1PPP/RNBQKB1R");
}

#[test]
fn spare_squares_stay_out_of_fen() {
    let mut position = pos! { E4 => wP };
    position.insert(Square::from_algebraic("sw2").unwrap(), piece!(wQ));
    assert_eq!(position.to_fen(), "8/8/8/8/4P3/8/8/8");
}

#[test]
fn serde_json_form() {
    let position = pos! { E4 => wP };
    let json = serde_json::to_string(&position).unwrap();
    assert_eq!(json, r#"{"e4":"wP"}"#);
    let parsed: Position = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, position);
}
