// Host-supplied notification handlers. Every slot is optional; a missing handler behaves as if
// it returned the default value.
//
// Handlers receive borrowed snapshots of the board state and cannot call back into the board.
// Hosts that want to react (e.g. by setting a new position from `on_change`) should record the
// request and issue it after the current board call returns.

use crate::coord::{Coord, Location, Square};
use crate::display::Orientation;
use crate::error::BoardError;
use crate::piece::PieceCode;
use crate::position::Position;


#[derive(Clone, Copy, Debug)]
pub struct DragStartEvent<'a> {
    pub source: Square,
    pub piece: PieceCode,
    pub position: &'a Position,
    pub orientation: Orientation,
}

#[derive(Clone, Copy, Debug)]
pub struct DragMoveEvent<'a> {
    pub location: Location,
    pub previous_location: Location,
    pub source: Square,
    pub piece: PieceCode,
    pub position: &'a Position,
    pub orientation: Orientation,
}

#[derive(Clone, Copy, Debug)]
pub struct DropEvent<'a> {
    pub source: Square,
    pub target: Location,
    pub piece: PieceCode,
    // What the position would become if the piece were dropped onto `target`.
    pub new_position: &'a Position,
    pub old_position: &'a Position,
    pub orientation: Orientation,
}

// Return value of `on_drop`. `Default` keeps the action chosen by the board: drop on an ordinary
// square, otherwise the configured off-board policy.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DropResponse {
    #[default]
    Default,
    Snapback,
    Trash,
}

#[derive(Clone, Copy, Debug)]
pub struct SnapbackEndEvent<'a> {
    pub piece: PieceCode,
    pub source: Square,
    pub position: &'a Position,
    pub orientation: Orientation,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SnapEndEvent {
    pub source: Square,
    pub target: Square,
    pub piece: PieceCode,
}

#[derive(Clone, Copy, Debug)]
pub struct SquareHoverEvent<'a> {
    pub square: Coord,
    pub piece: Option<PieceCode>,
    pub position: &'a Position,
    pub orientation: Orientation,
}

#[derive(Default)]
pub struct BoardHooks {
    // Fires once per committed position change with (old, new). Suppressed when the FEN does
    // not change.
    pub on_change: Option<Box<dyn FnMut(&Position, &Position)>>,
    // Fires after an animated position change finishes, with (old, new).
    pub on_move_end: Option<Box<dyn FnMut(&Position, &Position)>>,
    // Returning false vetoes the drag.
    pub on_drag_start: Option<Box<dyn FnMut(&DragStartEvent) -> bool>>,
    pub on_drag_move: Option<Box<dyn FnMut(&DragMoveEvent)>>,
    pub on_drop: Option<Box<dyn FnMut(&DropEvent) -> DropResponse>>,
    pub on_snapback_end: Option<Box<dyn FnMut(&SnapbackEndEvent)>>,
    pub on_snap_end: Option<Box<dyn FnMut(SnapEndEvent)>>,
    pub on_mouseover_square: Option<Box<dyn FnMut(&SquareHoverEvent)>>,
    pub on_mouseout_square: Option<Box<dyn FnMut(&SquareHoverEvent)>>,
    // Custom diagnostics channel. Overrides `BoardConfig::show_errors`.
    pub on_error: Option<Box<dyn FnMut(&BoardError)>>,
}

impl BoardHooks {
    pub fn new() -> Self { Self::default() }

    pub(crate) fn change(&mut self, old: &Position, new: &Position) {
        if let Some(hook) = &mut self.on_change {
            hook(old, new);
        }
    }
    pub(crate) fn move_end(&mut self, old: &Position, new: &Position) {
        if let Some(hook) = &mut self.on_move_end {
            hook(old, new);
        }
    }
    pub(crate) fn drag_start(&mut self, event: &DragStartEvent) -> bool {
        self.on_drag_start.as_mut().is_none_or(|hook| hook(event))
    }
    pub(crate) fn drag_move(&mut self, event: &DragMoveEvent) {
        if let Some(hook) = &mut self.on_drag_move {
            hook(event);
        }
    }
    pub(crate) fn drop_piece(&mut self, event: &DropEvent) -> DropResponse {
        self.on_drop.as_mut().map_or(DropResponse::Default, |hook| hook(event))
    }
    pub(crate) fn snapback_end(&mut self, event: &SnapbackEndEvent) {
        if let Some(hook) = &mut self.on_snapback_end {
            hook(event);
        }
    }
    pub(crate) fn snap_end(&mut self, event: SnapEndEvent) {
        if let Some(hook) = &mut self.on_snap_end {
            hook(event);
        }
    }
    pub(crate) fn has_hover_hooks(&self) -> bool {
        self.on_mouseover_square.is_some() || self.on_mouseout_square.is_some()
    }
    pub(crate) fn mouseover_square(&mut self, event: &SquareHoverEvent) {
        if let Some(hook) = &mut self.on_mouseover_square {
            hook(event);
        }
    }
    pub(crate) fn mouseout_square(&mut self, event: &SquareHoverEvent) {
        if let Some(hook) = &mut self.on_mouseout_square {
            hook(event);
        }
    }
}
