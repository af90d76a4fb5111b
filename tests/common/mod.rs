// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use board3d::coord::{Col, Coord, Row};
use board3d::piece::PieceCode;
use board3d::position::Position;
use board3d::util::as_single_char;
use itertools::Itertools;


#[macro_export]
macro_rules! piece {
    ($code:ident) => {
        board3d::piece::PieceCode::from_code(stringify!($code)).unwrap()
    };
}

// Position from `square => piece` pairs, e.g. `pos! { E2 => wP, E7 => bP }`.
#[macro_export]
macro_rules! pos {
    ($($square:ident => $code:ident),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut position = board3d::position::Position::new();
        $(
            position.insert(board3d::coord::Coord::$square, $crate::piece!($code));
        )*
        position
    }};
}

// Parses a board drawn with FEN piece letters, rank 8 first. Dots are empty squares.
#[allow(dead_code)]
pub fn parse_board(board_str: &str) -> Result<Position, String> {
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().collect_vec())
        .collect_vec();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|row| row.len() == 8));
    let mut position = Position::new();
    for (row_idx, row) in rows.iter().rev().enumerate() {
        for (col_idx, piece_str) in row.iter().enumerate() {
            let piece_char =
                as_single_char(piece_str).ok_or_else(|| format!("Invalid piece: {}", piece_str))?;
            if piece_char == '.' {
                continue;
            }
            let piece = PieceCode::from_fen_char(piece_char)
                .ok_or_else(|| format!("Invalid piece: {}", piece_char))?;
            let coord =
                Coord::new(Col::from_zero_based(col_idx as u8), Row::from_zero_based(row_idx as u8));
            position.insert(coord, piece);
        }
    }
    Ok(position)
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_board_opening() {
        let board_str = "
            r n b q k b n r
            p p p . p p p p
            . . . . . . . .
            . . . p . . . .
            . . . . P . . .
            . . . . . . . .
            P P P P . P P P
            R N B Q K B N R
        ";
        let position = parse_board(board_str).unwrap();
        assert_eq!(position.to_fen(), "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR");
    }

    #[test]
    fn pos_macro() {
        let position = pos! { E2 => wP, E7 => bP };
        assert_eq!(position.get(Coord::E2), Some(piece!(wP)));
        assert_eq!(position.len(), 2);
    }
}
