use std::fmt;

use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::force::Force;
use crate::util::as_single_char;


// Order matters: this is the order of spare tray slots ("sw1" is the white king).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

// Two-character piece code, e.g. "wP" or "bK". Always valid by construction: use
// `PieceCode::from_code` to parse untrusted input.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceCode {
    pub force: Force,
    pub kind: PieceKind,
}

impl PieceKind {
    pub fn to_algebraic_char(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }

    pub fn from_algebraic_char(notation: char) -> Option<Self> {
        match notation {
            'K' => Some(PieceKind::King),
            'Q' => Some(PieceKind::Queen),
            'R' => Some(PieceKind::Rook),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        as_single_char(notation).and_then(Self::from_algebraic_char)
    }
}

impl PieceCode {
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let force = Force::from_code_char(chars.next()?)?;
        let kind = PieceKind::from_algebraic_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(PieceCode { force, kind })
    }

    pub fn to_code(self) -> String {
        format!("{}{}", self.force.to_code_char(), self.kind.to_algebraic_char())
    }

    // FEN letter: uppercase for white, lowercase for black.
    pub fn to_fen_char(self) -> char {
        let ch = self.kind.to_algebraic_char();
        match self.force {
            Force::White => ch,
            Force::Black => ch.to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_algebraic_char(ch.to_ascii_uppercase())?;
        let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
        Some(PieceCode { force, kind })
    }

    pub fn to_pictogram(self) -> char { piece_to_pictogram(self.kind, self.force) }
}

pub fn validate_piece_code(code: &str) -> bool { PieceCode::from_code(code).is_some() }

pub fn piece_to_pictogram(piece_kind: PieceKind, force: Force) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, piece_kind) {
        (White, Pawn) => '♙',
        (White, Knight) => '♘',
        (White, Bishop) => '♗',
        (White, Rook) => '♖',
        (White, Queen) => '♕',
        (White, King) => '♔',
        (Black, Pawn) => '♟',
        (Black, Knight) => '♞',
        (Black, Bishop) => '♝',
        (Black, Rook) => '♜',
        (Black, Queen) => '♛',
        (Black, King) => '♚',
    }
}

impl fmt::Display for PieceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.to_code()) }
}

impl fmt::Debug for PieceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.to_code()) }
}

impl TryFrom<String> for PieceCode {
    type Error = String;
    fn try_from(code: String) -> Result<Self, Self::Error> {
        PieceCode::from_code(&code).ok_or_else(|| format!("invalid piece code: {code}"))
    }
}

impl From<PieceCode> for String {
    fn from(piece: PieceCode) -> Self { piece.to_code() }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_codes() {
        assert_eq!(PieceCode::from_code("wP"), Some(PieceCode::new(Force::White, PieceKind::Pawn)));
        assert_eq!(PieceCode::from_code("bK"), Some(PieceCode::new(Force::Black, PieceKind::King)));
        assert_eq!(PieceCode::from_code("wp"), None);
        assert_eq!(PieceCode::from_code("xP"), None);
        assert_eq!(PieceCode::from_code("wPP"), None);
        assert_eq!(PieceCode::from_code("w"), None);
        assert_eq!(PieceCode::from_code(""), None);
    }

    #[test]
    fn fen_letters() {
        let black_knight = PieceCode::new(Force::Black, PieceKind::Knight);
        assert_eq!(black_knight.to_fen_char(), 'n');
        assert_eq!(PieceCode::from_fen_char('n'), Some(black_knight));
        assert_eq!(PieceCode::from_fen_char('Q').unwrap().to_code(), "wQ");
        assert_eq!(PieceCode::from_fen_char('x'), None);
        assert_eq!(PieceCode::from_fen_char('3'), None);
    }
}
