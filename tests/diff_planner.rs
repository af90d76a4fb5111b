mod common;

use board3d::coord::{Coord, Square};
use board3d::diff::{Operation, OperationPhase, apply, execution_order, plan};
use board3d::fen::parse_fen;
use board3d::position::Position;
use common::*;
use itertools::Itertools;
use pretty_assertions::assert_eq;


const SAMPLE_FENS: [&str; 8] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR",
    "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R",
    "4k3/8/8/8/8/8/8/4K3",
    "8/8/8/8/8/8/8/8",
    "PPPPPPPP/8/8/8/8/8/8/pppppppp",
    "7k/6Q1/8/8/8/8/8/K7",
];

fn samples() -> Vec<Position> { SAMPLE_FENS.iter().map(|fen| parse_fen(fen).unwrap()).collect() }

fn move_op(source: Coord, destination: Coord, code: &str) -> Operation {
    Operation::Move {
        source: source.into(),
        destination: destination.into(),
        piece: board3d::piece::PieceCode::from_code(code).unwrap(),
    }
}


#[test]
fn plan_is_complete() {
    for (old, new) in samples().iter().cartesian_product(samples().iter()) {
        let ops = plan(old, new);
        assert_eq!(apply(old, &ops), *new, "{} -> {}", old.to_fen(), new.to_fen());
    }
}

#[test]
fn plan_is_deterministic() {
    for (old, new) in samples().iter().cartesian_product(samples().iter()) {
        // Rebuilding the maps in reverse order changes hash map iteration order.
        let old_rebuilt: Position = old.sorted_iter().rev().collect();
        let new_rebuilt: Position = new.sorted_iter().rev().collect();
        assert_eq!(plan(old, new), plan(&old_rebuilt, &new_rebuilt));
    }
}

#[test]
fn plan_touches_only_changed_squares() {
    for (old, new) in samples().iter().cartesian_product(samples().iter()) {
        for op in plan(old, new) {
            match op {
                Operation::Move { source, destination, piece } => {
                    assert_eq!(old.get(source), Some(piece));
                    assert_ne!(new.get(source), Some(piece));
                    assert_eq!(new.get(destination), Some(piece));
                    assert_ne!(old.get(destination), Some(piece));
                }
                Operation::Add { square, piece } => {
                    assert_eq!(new.get(square), Some(piece));
                    assert_ne!(old.get(square), Some(piece));
                }
                Operation::Clear { square, piece } => {
                    assert_eq!(old.get(square), Some(piece));
                    assert_ne!(new.get(square), Some(piece));
                }
            }
        }
    }
}

#[test]
fn each_source_moves_at_most_once() {
    for (old, new) in samples().iter().cartesian_product(samples().iter()) {
        let ops = plan(old, new);
        let sources = ops
            .iter()
            .filter_map(|op| match op {
                Operation::Move { source, .. } => Some(*source),
                _ => None,
            })
            .collect_vec();
        assert!(sources.iter().all_unique());
    }
}

#[test]
fn single_pawn_push() {
    let old = Position::start();
    let new = parse_fen(SAMPLE_FENS[1]).unwrap();
    assert_eq!(plan(&old, &new), vec![move_op(Coord::E2, Coord::E4, "wP")]);
}

#[test]
fn nearest_candidate_wins() {
    let old = pos! { A1 => wR, H1 => wR };
    let new = pos! { G1 => wR, A1 => wR };
    assert_eq!(plan(&old, &new), vec![move_op(Coord::H1, Coord::G1, "wR")]);
}

#[test]
fn rooks_move_straight_up() {
    let old = pos! { A1 => wR, H1 => wR };
    let new = pos! { A3 => wR, H3 => wR };
    assert_eq!(plan(&old, &new), vec![
        move_op(Coord::A1, Coord::A3, "wR"),
        move_op(Coord::H1, Coord::H3, "wR"),
    ]);
}

#[test]
fn equal_distance_picks_smallest_source() {
    let old = pos! { A1 => wR, A5 => wR };
    let new = pos! { A3 => wR };
    assert_eq!(plan(&old, &new), vec![
        move_op(Coord::A1, Coord::A3, "wR"),
        Operation::Clear { square: Coord::A5.into(), piece: piece!(wR) },
    ]);
}

#[test]
fn destinations_are_visited_in_square_order() {
    // b3 comes before c1, so it claims the knight on b1 although c1 is closer to it.
    let old = pos! { B1 => wN };
    let new = pos! { B3 => wN, C1 => wN };
    assert_eq!(plan(&old, &new), vec![
        move_op(Coord::B1, Coord::B3, "wN"),
        Operation::Add { square: Coord::C1.into(), piece: piece!(wN) },
    ]);
}

#[test]
fn equal_distance_knights() {
    // Knights on b1 and d1 are both one step from c2. b1 sorts first.
    let old = pos! { D1 => wN, B1 => wN };
    let new = pos! { C2 => wN };
    assert_eq!(plan(&old, &new), vec![
        move_op(Coord::B1, Coord::C2, "wN"),
        Operation::Clear { square: Coord::D1.into(), piece: piece!(wN) },
    ]);
}

#[test]
fn tray_pieces_become_adds() {
    let mut old = Position::new();
    old.insert(Square::from_algebraic("sb5").unwrap(), piece!(bN));
    let new = pos! { F6 => bN };
    let ops = plan(&old, &new);
    assert_eq!(ops, vec![
        Operation::Add { square: Coord::F6.into(), piece: piece!(bN) },
        Operation::Clear { square: Square::from_algebraic("sb5").unwrap(), piece: piece!(bN) },
    ]);
}

#[test]
fn execution_starts_with_clears() {
    let old = parse_fen(SAMPLE_FENS[3]).unwrap();
    let new = parse_fen(SAMPLE_FENS[7]).unwrap();
    let ordered = execution_order(&plan(&old, &new));
    let phases = ordered.iter().map(Operation::phase).collect_vec();
    assert!(phases.is_sorted());
    assert_eq!(phases.first(), Some(&OperationPhase::Clear));
}
