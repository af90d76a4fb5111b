use std::fmt;

use enum_map::Enum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use strum::IntoEnumIterator;

use crate::force::Force;
use crate::piece::{PieceCode, PieceKind};


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;
pub const NUM_SPARE_SLOTS: u8 = 6;

// One tray slot per piece kind.
const_assert_eq!(NUM_SPARE_SLOTS as usize, 6);


// Rank. Row 0 is rank '1'.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('1' as u32)?;
        (idx < NUM_ROWS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}

// File. Col 0 is file 'a'.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('a' as u32)?;
        (idx < NUM_COLS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}


// Ordinary board square. Ordering is file-major, rank-minor: a1 < a2 < ... < a8 < b1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub col: Col,
    pub row: Row,
}

impl Coord {
    pub const fn new(col: Col, row: Row) -> Self { Self { col, row } }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord::new(Col::from_algebraic(col)?, Row::from_algebraic(row)?))
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    // All squares in canonical order.
    pub fn all() -> impl Iterator<Item = Coord> {
        Col::all().cartesian_product(Row::all()).map(|(col, row)| Coord::new(col, row))
    }

    // Max of absolute file and rank differences.
    pub fn chebyshev_distance(self, other: Coord) -> u8 {
        let d_col = self.col.to_zero_based().abs_diff(other.col.to_zero_based());
        let d_row = self.row.to_zero_based().abs_diff(other.row.to_zero_based());
        d_col.max(d_row)
    }

    const fn from_const_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        assert!(bytes.len() == 2);
        Coord::new(Col::from_zero_based(bytes[0] - b'A'), Row::from_zero_based(bytes[1] - b'1'))
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.to_algebraic())
    }
}


// Off-board tray slot, e.g. "sw1". Each slot holds an unlimited supply of one piece.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SpareSquare {
    pub force: Force,
    slot: u8, // 0-based
}

impl SpareSquare {
    pub fn for_piece(piece: PieceCode) -> Self {
        SpareSquare { force: piece.force, slot: piece.kind.into_usize() as u8 }
    }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (prefix, force, slot) = s.chars().collect_tuple()?;
        if prefix != 's' {
            return None;
        }
        let force = Force::from_code_char(force)?;
        let slot = slot.to_digit(10)?.checked_sub(1)? as u8;
        (slot < NUM_SPARE_SLOTS).then_some(SpareSquare { force, slot })
    }

    pub fn to_algebraic(self) -> String {
        format!("s{}{}", self.force.to_code_char(), self.slot + 1)
    }

    pub fn slot_zero_based(self) -> u8 { self.slot }

    pub fn piece(self) -> PieceCode {
        PieceCode::new(self.force, PieceKind::from_usize(self.slot as usize))
    }

    pub fn all() -> impl Iterator<Item = SpareSquare> {
        Force::iter()
            .cartesian_product(0..NUM_SPARE_SLOTS)
            .map(|(force, slot)| SpareSquare { force, slot })
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Square {
    Board(Coord),
    Spare(SpareSquare),
}

impl Square {
    pub fn from_algebraic(s: &str) -> Option<Self> {
        Coord::from_algebraic(s)
            .map(Square::Board)
            .or_else(|| SpareSquare::from_algebraic(s).map(Square::Spare))
    }

    pub fn to_algebraic(self) -> String {
        match self {
            Square::Board(coord) => coord.to_algebraic(),
            Square::Spare(spare) => spare.to_algebraic(),
        }
    }

    pub fn is_ordinary(self) -> bool { matches!(self, Square::Board(_)) }
    pub fn is_spare(self) -> bool { matches!(self, Square::Spare(_)) }

    pub fn coord(self) -> Option<Coord> {
        match self {
            Square::Board(coord) => Some(coord),
            Square::Spare(_) => None,
        }
    }
}

impl From<Coord> for Square {
    fn from(coord: Coord) -> Self { Square::Board(coord) }
}

impl From<SpareSquare> for Square {
    fn from(spare: SpareSquare) -> Self { Square::Spare(spare) }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_algebraic()) }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_algebraic()) }
}

impl TryFrom<String> for Square {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&s).ok_or_else(|| format!("invalid square: {s}"))
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self { square.to_algebraic() }
}

pub fn validate_square(s: &str) -> bool { Square::from_algebraic(s).is_some() }
pub fn validate_ordinary_square(s: &str) -> bool { Coord::from_algebraic(s).is_some() }
pub fn validate_spare_square(s: &str) -> bool { SpareSquare::from_algebraic(s).is_some() }


// Where a pointer currently projects to. Anything that is not a square is "offboard".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Location {
    Square(Square),
    Offboard,
}

impl Location {
    pub fn square(self) -> Option<Square> {
        match self {
            Location::Square(square) => Some(square),
            Location::Offboard => None,
        }
    }
    pub fn coord(self) -> Option<Coord> { self.square().and_then(Square::coord) }
    pub fn is_ordinary(self) -> bool { self.coord().is_some() }
}

impl From<Square> for Location {
    fn from(square: Square) -> Self { Location::Square(square) }
}

impl From<Coord> for Location {
    fn from(coord: Coord) -> Self { Location::Square(Square::Board(coord)) }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Square(square) => write!(f, "{square}"),
            Location::Offboard => f.write_str("offboard"),
        }
    }
}


macro_rules! define_coord_constants {
    ($($name:ident)*) => {
        impl Coord {
            #![allow(dead_code)]
            $(pub const $name: Coord = Coord::from_const_name(stringify!($name));)*
        }
    };
}

define_coord_constants! {
    A1 A2 A3 A4 A5 A6 A7 A8
    B1 B2 B3 B4 B5 B6 B7 B8
    C1 C2 C3 C4 C5 C6 C7 C8
    D1 D2 D3 D4 D5 D6 D7 D8
    E1 E2 E3 E4 E5 E6 E7 E8
    F1 F2 F3 F4 F5 F6 F7 F8
    G1 G2 G3 G4 G5 G6 G7 G8
    H1 H2 H3 H4 H5 H6 H7 H8
}
