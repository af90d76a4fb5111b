use std::fmt;

use crate::coord::Square;


#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}

// Everything that can go wrong in the widget. None of these are fatal: the offending call
// becomes a no-op (malformed input) or the board heals itself (consistency violations).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BoardError {
    InvalidFen(String),
    InvalidPosition(String),
    InvalidSquare(String),
    InvalidPieceCode(String),
    InvalidMove(String),
    InvalidOrientation(String),
    InvalidConfigPosition(String),
    // Registry knows the square, the scene lost its visual. Healed by recreating it.
    VisualMissing(Square),
    // Registry has a visual for a square that is empty in the canonical position.
    VisualOrphaned(Square),
    // Canonical position has a piece without a visual. Healed by creating one.
    PositionWithoutVisual(Square),
}

impl BoardError {
    // Stable numeric codes for the diagnostics channel.
    pub fn code(&self) -> u32 {
        match self {
            BoardError::InvalidMove(_) => 2826,
            BoardError::VisualOrphaned(_) => 3701,
            BoardError::VisualMissing(_) => 3702,
            BoardError::PositionWithoutVisual(_) => 3703,
            BoardError::InvalidOrientation(_) => 5482,
            BoardError::InvalidPosition(_) => 6482,
            BoardError::InvalidFen(_) => 6483,
            BoardError::InvalidSquare(_) => 6484,
            BoardError::InvalidPieceCode(_) => 6485,
            BoardError::InvalidConfigPosition(_) => 7263,
        }
    }

    pub fn is_consistency_violation(&self) -> bool {
        matches!(
            self,
            BoardError::VisualMissing(_)
                | BoardError::VisualOrphaned(_)
                | BoardError::PositionWithoutVisual(_)
        )
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board error {}: ", self.code())?;
        match self {
            BoardError::InvalidFen(s) => write!(f, "invalid FEN: {s}"),
            BoardError::InvalidPosition(s) => write!(f, "invalid position: {s}"),
            BoardError::InvalidSquare(s) => write!(f, "invalid square: {s}"),
            BoardError::InvalidPieceCode(s) => write!(f, "invalid piece code: {s}"),
            BoardError::InvalidMove(s) => write!(f, "invalid move: {s}"),
            BoardError::InvalidOrientation(s) => write!(f, "invalid orientation: {s}"),
            BoardError::InvalidConfigPosition(s) => write!(f, "invalid initial position: {s}"),
            BoardError::VisualMissing(sq) => {
                write!(f, "visual missing on square {sq}, adding a replacement")
            }
            BoardError::VisualOrphaned(sq) => {
                write!(f, "square {sq} has a visual but no piece in the position")
            }
            BoardError::PositionWithoutVisual(sq) => {
                write!(f, "square {sq} has a piece in the position but no visual")
            }
        }
    }
}

impl std::error::Error for BoardError {}
