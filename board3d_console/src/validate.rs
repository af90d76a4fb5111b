use std::io;

use itertools::Itertools;

use crate::board3d_prelude::*;


// Reports which kinds of board input `value` is valid as.
pub fn run(value: &str) -> io::Result<()> {
    let checks = [
        ("FEN", validate_fen(value)),
        ("square", validate_square(value)),
        ("piece code", validate_piece_code(value)),
        ("move", validate_move(value)),
        ("position", PositionSource::parse(value).is_ok()),
    ];
    let matched = checks.iter().filter(|(_, ok)| *ok).map(|(kind, _)| *kind).collect_vec();
    if matched.is_empty() {
        eprintln!("{value:?} is not a valid FEN, square, piece code, move or position");
        return Err(io::Error::from(io::ErrorKind::InvalidData));
    }
    println!("OK: {}", matched.join(", "));
    Ok(())
}
