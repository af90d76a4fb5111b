// Position diffing: finds a small set of move/add/clear operations that turn one position into
// another and look natural when animated.
//
// Pieces have no identity beyond their code. When a piece appears on a square, the nearest
// vacated piece with the same code is assumed to have moved there. Two white pawns are
// interchangeable, so the animation shows "the closest pawn moved", which is not necessarily the
// pawn the user thinks of. This is intentional: matching is a visual heuristic, not tracking.

use std::collections::BTreeMap;
use std::fmt;

use enum_map::Enum;
use itertools::Itertools;

use crate::coord::Square;
use crate::piece::PieceCode;
use crate::position::Position;


#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Move { source: Square, destination: Square, piece: PieceCode },
    Add { square: Square, piece: PieceCode },
    Clear { square: Square, piece: PieceCode },
}

// Operations are started phase by phase. Operations within a phase run concurrently.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum)]
pub enum OperationPhase {
    Clear,
    Move,
    Add,
}

impl Operation {
    pub fn phase(&self) -> OperationPhase {
        match self {
            Operation::Clear { .. } => OperationPhase::Clear,
            Operation::Move { .. } => OperationPhase::Move,
            Operation::Add { .. } => OperationPhase::Add,
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Move { source, destination, piece } => {
                write!(f, "Move({piece} {source}->{destination})")
            }
            Operation::Add { square, piece } => write!(f, "Add({piece} {square})"),
            Operation::Clear { square, piece } => write!(f, "Clear({piece} {square})"),
        }
    }
}

// Distance used to pick the nearest candidate. Spare squares are never matched: pieces added from
// or dropped into a tray are plain adds and clears.
fn match_distance(from: Square, to: Square) -> Option<u8> {
    Some(from.coord()?.chebyshev_distance(to.coord()?))
}

// Computes the operations transforming `old` into `new`. Pure and deterministic: new squares are
// visited in canonical order (file-major, rank-minor) and distance ties go to the smallest square.
//
// Returns moves first, then adds, then clears. Use `execution_order` to get the order in which
// they must be started.
pub fn plan(old: &Position, new: &Position) -> Vec<Operation> {
    // Sorted maps make every step below deterministic.
    let mut old_left: BTreeMap<Square, PieceCode> = old.iter().collect();
    let mut new_left: BTreeMap<Square, PieceCode> = new.iter().collect();

    new_left.retain(|square, piece| {
        if old_left.get(square) == Some(&*piece) {
            old_left.remove(square);
            false
        } else {
            true
        }
    });

    let mut operations = Vec::new();

    let new_squares = new_left.keys().copied().collect_vec();
    for destination in new_squares {
        let piece = new_left[&destination];
        let nearest = old_left
            .iter()
            .filter(|&(_, &old_piece)| old_piece == piece)
            .filter_map(|(&source, _)| {
                match_distance(source, destination).map(|distance| (distance, source))
            })
            .min();
        if let Some((_, source)) = nearest {
            operations.push(Operation::Move { source, destination, piece });
            old_left.remove(&source);
            new_left.remove(&destination);
        }
    }

    operations.extend(new_left.into_iter().map(|(square, piece)| Operation::Add { square, piece }));
    operations
        .extend(old_left.into_iter().map(|(square, piece)| Operation::Clear { square, piece }));
    operations
}

// Clears, then moves, then adds. Stable within each phase.
pub fn execution_order(operations: &[Operation]) -> Vec<Operation> {
    operations.iter().copied().sorted_by_key(Operation::phase).collect()
}

// Applies operations the way the animations do: clears first, then all moves at once, then adds.
pub fn apply(position: &Position, operations: &[Operation]) -> Position {
    let mut result = position.clone();
    for op in operations {
        if let Operation::Clear { square, .. } = *op {
            result.remove(square);
        }
    }
    let lifted = operations
        .iter()
        .filter_map(|op| match *op {
            Operation::Move { source, destination, piece } => {
                result.remove(source);
                Some((destination, piece))
            }
            _ => None,
        })
        .collect_vec();
    for (destination, piece) in lifted {
        result.insert(destination, piece);
    }
    for op in operations {
        if let Operation::Add { square, piece } = *op {
            result.insert(square, piece);
        }
    }
    result
}
