// Runs one drag gesture against a headless board and reports every hook it triggers.

use std::io;

use board3d::test_util::{
    HookLog, ManualClock, drag_and_release, headless_board, offboard_screen_point,
    recording_hooks, run_animations, screen_point,
};

use crate::board3d_prelude::*;
use crate::{parse_position, tui};


pub struct DragConfig {
    pub position: String,
    pub from: String,
    // A square, or "offboard".
    pub to: String,
    pub board_config: BoardConfig,
}

fn parse_square(s: &str) -> io::Result<Square> {
    Square::from_algebraic(s).ok_or_else(|| {
        eprintln!("Invalid square: {s}");
        io::Error::from(io::ErrorKind::InvalidInput)
    })
}

pub fn run(config: DragConfig) -> io::Result<()> {
    let position = parse_position(&config.position)?;
    let from = parse_square(&config.from)?;
    let to = if config.to == "offboard" { None } else { Some(parse_square(&config.to)?) };
    let board_config = BoardConfig { draggable: true, ..config.board_config };
    let orientation = board_config.orientation;
    let spare_pieces = board_config.spare_pieces;

    let log = HookLog::default();
    let mut board = headless_board(board_config, recording_hooks(&log, None));
    let mut clock = ManualClock::new();
    board.set_position(PositionSource::Position(position), false, clock.now());
    log.take();

    let from_point = screen_point(&board, from);
    let to_point = match to {
        Some(square) => screen_point(&board, square),
        None => offboard_screen_point(&board),
    };
    if !drag_and_release(&mut board, from_point, to_point, clock.now()) {
        println!("Nothing to drag on {from}");
    }
    run_animations(&mut board, &mut clock, 16);
    for event in log.take() {
        println!("{event:?}");
    }
    println!("{}", tui::render_position(board.position(), orientation, spare_pieces));
    Ok(())
}
