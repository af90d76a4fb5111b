// Board-state model: a square -> piece map plus the textual forms used to build one.

use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::coord::{Square, validate_square};
use crate::error::BoardError;
use crate::fen::{START_FEN, parse_fen, position_to_fen, validate_fen};
use crate::lazy_regex;
use crate::piece::{PieceCode, validate_piece_code};


// At most one piece per square. Keys and values are valid by construction. May contain spare
// squares, which FEN ignores.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position {
    pieces: HashMap<Square, PieceCode>,
}

impl Position {
    pub fn new() -> Self { Self::default() }

    pub fn start() -> Self {
        parse_fen(START_FEN)
            .unwrap_or_else(|err| panic!("{}", crate::internal_error_message!("{err}")))
    }

    pub fn get(&self, square: impl Into<Square>) -> Option<PieceCode> {
        self.pieces.get(&square.into()).copied()
    }
    pub fn contains(&self, square: impl Into<Square>) -> bool {
        self.pieces.contains_key(&square.into())
    }
    // Returns the previous occupant.
    pub fn insert(&mut self, square: impl Into<Square>, piece: PieceCode) -> Option<PieceCode> {
        self.pieces.insert(square.into(), piece)
    }
    pub fn remove(&mut self, square: impl Into<Square>) -> Option<PieceCode> {
        self.pieces.remove(&square.into())
    }

    pub fn len(&self) -> usize { self.pieces.len() }
    pub fn is_empty(&self) -> bool { self.pieces.is_empty() }

    // Arbitrary order. Use `sorted_iter` when order matters.
    pub fn iter(&self) -> impl Iterator<Item = (Square, PieceCode)> + '_ {
        self.pieces.iter().map(|(&square, &piece)| (square, piece))
    }
    pub fn sorted_iter(&self) -> impl DoubleEndedIterator<Item = (Square, PieceCode)> + '_ {
        self.iter().sorted_by_key(|&(square, _)| square)
    }
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ { self.pieces.keys().copied() }

    pub fn to_fen(&self) -> String { position_to_fen(self) }

    // Builds a position from an untyped square -> code map, e.g. one deserialized from JSON.
    pub fn from_string_map(map: &HashMap<String, String>) -> Result<Self, BoardError> {
        let mut position = Position::new();
        for (square, piece) in map.iter().sorted() {
            let square = Square::from_algebraic(square)
                .ok_or_else(|| BoardError::InvalidSquare(square.clone()))?;
            let piece = PieceCode::from_code(piece)
                .ok_or_else(|| BoardError::InvalidPieceCode(piece.clone()))?;
            position.insert(square, piece);
        }
        Ok(position)
    }

    // Relocates pieces. Moves are applied simultaneously; moves from an empty square are skipped.
    // If several moves share a source, the last one decides the destination.
    pub fn with_moves(&self, moves: &[BoardMove]) -> Position {
        let mut planned: Vec<BoardMove> = Vec::new();
        for &m in moves {
            match planned.iter_mut().find(|p| p.source == m.source) {
                Some(p) => p.destination = m.destination,
                None => planned.push(m),
            }
        }
        let mut position = self.clone();
        let lifted = planned
            .iter()
            .filter_map(|m| position.remove(m.source).map(|piece| (m.destination, piece)))
            .collect_vec();
        for (destination, piece) in lifted {
            position.insert(destination, piece);
        }
        position
    }
}

impl FromIterator<(Square, PieceCode)> for Position {
    fn from_iter<T: IntoIterator<Item = (Square, PieceCode)>>(iter: T) -> Self {
        Position { pieces: iter.into_iter().collect() }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Position ")?;
        f.debug_map().entries(self.sorted_iter()).finish()
    }
}

// Syntactic check of an untyped position object: every key is a square, every value a piece code.
pub fn validate_position(map: &HashMap<String, String>) -> bool {
    map.iter().all(|(square, piece)| validate_square(square) && validate_piece_code(piece))
}


// Square-to-square relocation written as "src-dst". No legality checks: the source may be empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoardMove {
    pub source: Square,
    pub destination: Square,
}

impl BoardMove {
    pub fn from_notation(s: &str) -> Option<Self> {
        let re = lazy_regex!(r"^([a-h][1-8]|s[wb][1-6])-([a-h][1-8]|s[wb][1-6])$");
        let cap = re.captures(s)?;
        Some(BoardMove {
            source: Square::from_algebraic(cap.get(1)?.as_str())?,
            destination: Square::from_algebraic(cap.get(2)?.as_str())?,
        })
    }
}

impl fmt::Display for BoardMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.destination)
    }
}

pub fn validate_move(s: &str) -> bool { BoardMove::from_notation(s).is_some() }


// Anything that can be turned into a position by `Board::set_position`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PositionSource {
    Start,
    Fen(String),
    Position(Position),
}

impl PositionSource {
    // Accepts "start", a FEN, or a JSON object mapping squares to piece codes.
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("start") {
            return Ok(PositionSource::Start);
        }
        if validate_fen(s) {
            return Ok(PositionSource::Fen(s.to_owned()));
        }
        let map: HashMap<String, String> = serde_json::from_str(s)
            .map_err(|_| BoardError::InvalidPosition(s.to_owned()))?;
        if !validate_position(&map) {
            return Err(BoardError::InvalidPosition(s.to_owned()));
        }
        Position::from_string_map(&map).map(PositionSource::Position)
    }

    pub fn resolve(self) -> Result<Position, BoardError> {
        match self {
            PositionSource::Start => Ok(Position::start()),
            PositionSource::Fen(fen) => parse_fen(&fen),
            PositionSource::Position(position) => Ok(position),
        }
    }
}

impl From<Position> for PositionSource {
    fn from(position: Position) -> Self { PositionSource::Position(position) }
}
