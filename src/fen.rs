// FEN support is limited to piece placement. Trailing fields (active color, castling rights,
// en passant target, clocks) are accepted and ignored when parsing and never produced.

use itertools::Itertools;

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row, Square};
use crate::error::BoardError;
use crate::piece::PieceCode;
use crate::position::Position;


pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const RANK_SEPARATOR: char = '/';

fn strip_metadata(fen: &str) -> &str { fen.split(' ').next().unwrap_or_default() }

// Walks one rank group. Returns the pieces with their columns or `None` if the group is
// malformed: empty, containing unknown characters or spanning more than eight columns.
fn parse_rank_group(group: &str) -> Option<Vec<(Col, PieceCode)>> {
    if group.is_empty() {
        return None;
    }
    let mut pieces = Vec::new();
    let mut col: u8 = 0;
    for ch in group.chars() {
        if let Some(n) = ch.to_digit(10) {
            if !(1..=8).contains(&n) {
                return None;
            }
            col += n as u8;
        } else {
            let piece = PieceCode::from_fen_char(ch)?;
            if col >= NUM_COLS {
                return None;
            }
            pieces.push((Col::from_zero_based(col), piece));
            col += 1;
        }
        if col > NUM_COLS {
            return None;
        }
    }
    Some(pieces)
}

fn parse_rank_groups(fen: &str) -> Option<Vec<Vec<(Col, PieceCode)>>> {
    let groups = strip_metadata(fen).split(RANK_SEPARATOR).collect_vec();
    if groups.len() != NUM_ROWS as usize {
        return None;
    }
    groups.into_iter().map(parse_rank_group).collect()
}

pub fn validate_fen(fen: &str) -> bool { parse_rank_groups(fen).is_some() }

pub fn parse_fen(fen: &str) -> Result<Position, BoardError> {
    let groups = parse_rank_groups(fen).ok_or_else(|| BoardError::InvalidFen(fen.to_owned()))?;
    // Most significant rank first.
    Ok(groups
        .into_iter()
        .zip(Row::all().rev())
        .flat_map(|(pieces, row)| {
            pieces.into_iter().map(move |(col, piece)| (Square::Board(Coord::new(col, row)), piece))
        })
        .collect())
}

// Ranks 8 to 1, files a to h. Each run of empty squares collapses into a single digit, so
// the output is canonical. Spare squares are not part of FEN.
pub fn position_to_fen(position: &Position) -> String {
    Row::all()
        .rev()
        .map(|row| {
            let mut rank_notation = String::new();
            let mut empty_col_count: u8 = 0;
            for col in Col::all() {
                if let Some(piece) = position.get(Coord::new(col, row)) {
                    if empty_col_count > 0 {
                        rank_notation.push_str(&empty_col_count.to_string());
                        empty_col_count = 0;
                    }
                    rank_notation.push(piece.to_fen_char());
                } else {
                    empty_col_count += 1;
                }
            }
            if empty_col_count > 0 {
                rank_notation.push_str(&empty_col_count.to_string());
            }
            rank_notation
        })
        .join(&RANK_SEPARATOR.to_string())
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn start_position() {
        let position = parse_fen(START_FEN).unwrap();
        assert_eq!(position.len(), 32);
        assert_eq!(position.get(Coord::E1).unwrap().to_code(), "wK");
        assert_eq!(position.get(Coord::D8).unwrap().to_code(), "bQ");
        assert_eq!(position.get(Coord::H7).unwrap().to_code(), "bP");
        assert_eq!(position_to_fen(&position), START_FEN);
    }

    #[test]
    fn validation_boundary() {
        assert!(validate_fen(START_FEN));
        assert!(validate_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(validate_fen("8/8/8/8/8/8/8/8"));
        // Seven groups.
        assert!(!validate_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR"));
        // Empty group.
        assert!(!validate_fen("rnbqkbnr/pppppppp//8/8/8/PPPPPPPP/RNBQKBNR"));
        // Unknown letter.
        assert!(!validate_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR"));
        // Zero and nine are not run lengths.
        assert!(!validate_fen("rnbqkbnr/pppppppp/8/8/08/8/PPPPPPPP/RNBQKBNR"));
        assert!(!validate_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR"));
        // Nine columns.
        assert!(!validate_fen("rnbqkbnr/pppppppp/8/8/8/4P4/PPPPPPPP/RNBQKBNR"));
        assert!(!validate_fen("rnbqkbnrp/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"));
        assert!(!validate_fen(""));
    }

    #[test]
    fn empty_runs_are_collapsed() {
        let mut position = Position::new();
        position.insert(Coord::A1, PieceCode::from_code("wK").unwrap());
        position.insert(Coord::H1, PieceCode::from_code("bK").unwrap());
        position.insert(Coord::D5, PieceCode::from_code("wP").unwrap());
        position.insert(Square::from_algebraic("sw3").unwrap(), PieceCode::from_code("wR").unwrap());
        assert_eq!(position_to_fen(&position), "8/8/8/3P4/8/8/8/K6k");
    }

    #[test]
    fn non_canonical_input_is_normalized() {
        let position = parse_fen("4/11111111/8/8/8/8/8/2K").unwrap();
        assert_eq!(position.get(Coord::C1).unwrap().to_code(), "wK");
        assert_eq!(position_to_fen(&position), "8/8/8/8/8/8/8/2K5");
    }
}
