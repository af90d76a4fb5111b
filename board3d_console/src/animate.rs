// Plays a position change on a headless board frame by frame and prints the result.

use std::io;
use std::time::Duration;

use board3d::test_util::ManualClock;
use log::{debug, info, warn};

use crate::board3d_prelude::*;
use crate::{parse_position, tui};


pub struct AnimateConfig {
    pub from: String,
    pub to: String,
    pub fps: u32,
    // Sleep between frames instead of running as fast as possible.
    pub realtime: bool,
    pub board_config: BoardConfig,
}

fn console_hooks() -> BoardHooks {
    let mut hooks = BoardHooks::new();
    hooks.on_change = Some(Box::new(|old: &Position, new: &Position| {
        info!("Change: {} -> {}", old.to_fen(), new.to_fen());
    }));
    hooks.on_move_end = Some(Box::new(|_: &Position, new: &Position| {
        info!("Animation finished at {}", new.to_fen());
    }));
    hooks.on_error = Some(Box::new(|err: &BoardError| warn!("{err}")));
    hooks
}

pub fn run(config: AnimateConfig) -> io::Result<()> {
    let old = parse_position(&config.from)?;
    let new = parse_position(&config.to)?;
    let orientation = config.board_config.orientation;
    let spare_pieces = config.board_config.spare_pieces;
    let frame_ms = 1000 / u64::from(config.fps.max(1));

    let mut board = Board::new(HeadlessScene::new(), config.board_config, console_hooks());
    let mut clock = ManualClock::new();
    board.set_position(PositionSource::Position(old), false, clock.now());
    println!("{}", tui::render_position(board.position(), orientation, spare_pieces));

    println!("{}\n", tui::render_operations(&execution_order(&plan(board.position(), &new))));
    board.set_position(PositionSource::Position(new), true, clock.now());
    board.scene_mut().take_render_requests();
    let mut frames = 0;
    while board.is_animating() {
        if config.realtime {
            std::thread::sleep(Duration::from_millis(frame_ms));
        }
        board.tick(clock.advance(frame_ms));
        frames += 1;
        let renders = board.scene_mut().take_render_requests();
        debug!("Frame {frames}: {renders} render requests");
    }
    info!("Done in {frames} frames ({:?})", clock.now());
    println!("{}", tui::render_position(board.position(), orientation, spare_pieces));
    Ok(())
}
