// Test utilities that cannot be moved to the "tests" folder, because the console uses them to
// drive a headless board.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::board::Board;
use crate::clock::AnimationInstant;
use crate::config::BoardConfig;
use crate::coord::{Coord, Location, Square};
use crate::error::BoardError;
use crate::headless::HeadlessScene;
use crate::hooks::{
    BoardHooks, DragMoveEvent, DragStartEvent, DropEvent, DropResponse, SnapEndEvent,
    SnapbackEndEvent, SquareHoverEvent,
};
use crate::piece::PieceCode;
use crate::position::Position;
use crate::scene::{ScreenPoint, WorldPoint};


// Time that only moves when told to.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now: AnimationInstant,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }
    pub fn now(&self) -> AnimationInstant { self.now }
    pub fn advance(&mut self, ms: u64) -> AnimationInstant {
        self.now += Duration::from_millis(ms);
        self.now
    }
}


// One hook invocation. Positions are recorded as FEN.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HookEvent {
    Change { old: String, new: String },
    MoveEnd { old: String, new: String },
    DragStart { source: Square, piece: PieceCode },
    DragMove { location: Location, previous_location: Location },
    Drop { source: Square, target: Location, new_fen: String },
    SnapbackEnd { source: Square, piece: PieceCode },
    SnapEnd { source: Square, target: Square, piece: PieceCode },
    MouseoverSquare { square: Coord, piece: Option<PieceCode> },
    MouseoutSquare { square: Coord, piece: Option<PieceCode> },
    Error { code: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct HookLog {
    events: Rc<RefCell<Vec<HookEvent>>>,
}

impl HookLog {
    pub fn push(&self, event: HookEvent) { self.events.borrow_mut().push(event); }
    pub fn events(&self) -> Vec<HookEvent> { self.events.borrow().clone() }
    pub fn take(&self) -> Vec<HookEvent> { std::mem::take(&mut *self.events.borrow_mut()) }
    pub fn count(&self, pred: impl Fn(&HookEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
    pub fn num_changes(&self) -> usize {
        self.count(|e| matches!(e, HookEvent::Change { .. }))
    }
}

// Hooks that record every notification. `on_drop` answers with `drop_response`.
pub fn recording_hooks(log: &HookLog, drop_response: Option<DropResponse>) -> BoardHooks {
    let mut hooks = BoardHooks::new();
    let l = log.clone();
    hooks.on_change = Some(Box::new(move |old: &Position, new: &Position| {
        l.push(HookEvent::Change { old: old.to_fen(), new: new.to_fen() })
    }));
    let l = log.clone();
    hooks.on_move_end = Some(Box::new(move |old: &Position, new: &Position| {
        l.push(HookEvent::MoveEnd { old: old.to_fen(), new: new.to_fen() })
    }));
    let l = log.clone();
    hooks.on_drag_start = Some(Box::new(move |e: &DragStartEvent| {
        l.push(HookEvent::DragStart { source: e.source, piece: e.piece });
        true
    }));
    let l = log.clone();
    hooks.on_drag_move = Some(Box::new(move |e: &DragMoveEvent| {
        l.push(HookEvent::DragMove {
            location: e.location,
            previous_location: e.previous_location,
        })
    }));
    if let Some(response) = drop_response {
        let l = log.clone();
        hooks.on_drop = Some(Box::new(move |e: &DropEvent| {
            l.push(HookEvent::Drop {
                source: e.source,
                target: e.target,
                new_fen: e.new_position.to_fen(),
            });
            response
        }));
    }
    let l = log.clone();
    hooks.on_snapback_end = Some(Box::new(move |e: &SnapbackEndEvent| {
        l.push(HookEvent::SnapbackEnd { source: e.source, piece: e.piece })
    }));
    let l = log.clone();
    hooks.on_snap_end = Some(Box::new(move |e: SnapEndEvent| {
        l.push(HookEvent::SnapEnd { source: e.source, target: e.target, piece: e.piece })
    }));
    let l = log.clone();
    hooks.on_mouseover_square = Some(Box::new(move |e: &SquareHoverEvent| {
        l.push(HookEvent::MouseoverSquare { square: e.square, piece: e.piece })
    }));
    let l = log.clone();
    hooks.on_mouseout_square = Some(Box::new(move |e: &SquareHoverEvent| {
        l.push(HookEvent::MouseoutSquare { square: e.square, piece: e.piece })
    }));
    let l = log.clone();
    hooks.on_error = Some(Box::new(move |e: &BoardError| l.push(HookEvent::Error { code: e.code() })));
    hooks
}

pub fn headless_board(config: BoardConfig, hooks: BoardHooks) -> Board<HeadlessScene> {
    Board::new(HeadlessScene::new(), config, hooks)
}

// Screen point over the centre of a square.
pub fn screen_point(board: &Board<HeadlessScene>, square: impl Into<Square>) -> ScreenPoint {
    let at = board.geometry().square_center(square.into());
    board.scene().screen_point(at)
}

// Screen point outside the board and outside the spare trays.
pub fn offboard_screen_point(board: &Board<HeadlessScene>) -> ScreenPoint {
    let s = board.geometry().square_size;
    let at = WorldPoint::on_plane(6.5 * s, 0.0);
    board.scene().screen_point(at)
}

// Presses on `from`, moves to `to` and releases there.
pub fn drag_and_release(
    board: &mut Board<HeadlessScene>, from: ScreenPoint, to: ScreenPoint, now: AnimationInstant,
) -> bool {
    if !board.pointer_down(from) {
        return false;
    }
    board.pointer_move(to);
    board.pointer_up(to, now);
    true
}

// Ticks until animations settle, `step_ms` at a time. Returns the number of ticks.
pub fn run_animations(board: &mut Board<HeadlessScene>, clock: &mut ManualClock, step_ms: u64) -> usize {
    let mut ticks = 0;
    while board.is_animating() {
        board.tick(clock.advance(step_ms));
        ticks += 1;
    }
    ticks
}
