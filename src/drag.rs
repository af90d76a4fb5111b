// Pointer interaction: picking, dragging a single piece and resolving the drag into a drop,
// a snapback or a trash.
//
// Drops and trashes change the canonical position directly, without going through the diff
// planner: they are the direct result of a finished gesture.

use itertools::Itertools;
use log::debug;

use crate::board::Board;
use crate::clock::AnimationInstant;
use crate::config::{AnimationKind, DropOffBoard};
use crate::coord::{Coord, Location, Square};
use crate::hooks::{
    DragMoveEvent, DragStartEvent, DropEvent, DropResponse, SnapEndEvent, SnapbackEndEvent,
    SquareHoverEvent,
};
use crate::piece::PieceCode;
use crate::position::Position;
use crate::scene::{HighlightKind, Picker, Scene, ScreenPoint, VisualId, WorldPoint};
use crate::util::lerp;


#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct DragSession {
    pub source: Square,
    pub piece: PieceCode,
    pub location: Location,
    pub visual: VisualId,
    // Hit point relative to the visual centre. Keeps the piece from jumping under the pointer.
    grab_offset: WorldPoint,
    // The pointer is projected onto the horizontal plane at this height.
    plane_height: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DropAction {
    Drop(Coord),
    Snapback,
    Trash,
}

// What lies under the pointer.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PointerTarget {
    pub location: Location,
    pub piece: Option<PieceCode>,
    pub visual: Option<VisualId>,
    pub point: WorldPoint,
    pub grab_offset: WorldPoint,
}

impl PointerTarget {
    fn offboard() -> Self {
        PointerTarget {
            location: Location::Offboard,
            piece: None,
            visual: None,
            point: WorldPoint::default(),
            grab_offset: WorldPoint::default(),
        }
    }
}

// The position the board would have if the piece were dropped where it is now.
fn position_after_drop(position: &Position, drag: &DragSession) -> Position {
    let mut new_position = position.clone();
    if drag.source.is_ordinary() {
        new_position.remove(drag.source);
    }
    if let Some(coord) = drag.location.coord() {
        new_position.insert(coord, drag.piece);
    }
    new_position
}

fn slide(start: WorldPoint, target: WorldPoint, t: f64) -> WorldPoint {
    WorldPoint::new(lerp(start.x, target.x, t), start.y, lerp(start.z, target.z, t))
}


impl<R: Scene + Picker + 'static> Board<R> {
    fn piece_on(&self, square: Square) -> Option<PieceCode> {
        match square {
            Square::Spare(spare) if self.state.tray.contains_key(&spare) => Some(spare.piece()),
            _ => self.state.position.get(square),
        }
    }

    fn visual_for(&self, square: Square) -> Option<VisualId> {
        let registered = self.state.visuals.get(&square).copied();
        match square {
            Square::Spare(spare) => registered.or_else(|| self.state.tray.get(&spare).copied()),
            Square::Board(_) => registered,
        }
    }

    // Resolves a screen point: a piece visual if one is hit, otherwise the square under the
    // pointer on the board plane, otherwise offboard.
    pub fn pick(&self, screen: ScreenPoint) -> PointerTarget {
        let state = &self.state;
        let candidates = state
            .visuals
            .iter()
            .map(|(&square, &visual)| (square, visual))
            .chain(state.tray.iter().map(|(&spare, &visual)| (Square::Spare(spare), visual)))
            .sorted()
            .collect_vec();
        let ids = candidates.iter().map(|&(_, visual)| visual).collect_vec();
        if let Some(hit) = state.scene.pick_visual(screen, &ids) {
            if let Some(&(square, visual)) = candidates.iter().find(|(_, v)| *v == hit.visual) {
                let center = state.scene.visual_position(visual).unwrap_or(hit.point);
                return PointerTarget {
                    location: square.into(),
                    piece: self.piece_on(square),
                    visual: Some(visual),
                    point: hit.point,
                    grab_offset: hit.point - center,
                };
            }
        }
        let Some(point) = state.scene.project_onto_plane(screen, 0.0) else {
            return PointerTarget::offboard();
        };
        let location = state.geometry.locate(point, state.config.spare_pieces);
        let (piece, visual) = match location.square() {
            Some(square) => (self.piece_on(square), self.visual_for(square)),
            None => (None, None),
        };
        let grab_offset = visual
            .and_then(|visual| state.scene.visual_position(visual))
            .map_or(WorldPoint::default(), |center| point - center);
        PointerTarget { location, piece, visual, point, grab_offset }
    }

    // Starts dragging the piece under the pointer. Returns whether a drag started. Refused
    // while a position change is animating or queued.
    pub fn pointer_down(&mut self, screen: ScreenPoint) -> bool {
        if self.state.destroyed || self.state.drag.is_some() || !self.state.config.draggable {
            return false;
        }
        if self.has_position_requests_in_flight() {
            debug!("Drag refused: position change in progress");
            return false;
        }
        let target = self.pick(screen);
        let (Location::Square(source), Some(piece), Some(visual)) =
            (target.location, target.piece, target.visual)
        else {
            return false;
        };
        let event = DragStartEvent {
            source,
            piece,
            position: &*self.state.position,
            orientation: self.state.orientation,
        };
        if !self.state.hooks.drag_start(&event) {
            debug!("Drag from {source} vetoed");
            return false;
        }
        let visual = if source.is_spare() {
            // The tray keeps its piece; a copy is dragged onto the board.
            let Some(copy) = self.state.scene.clone_visual(visual) else {
                return false;
            };
            if let Some(at) = self.state.scene.visual_position(copy) {
                self.state.scene.set_visual_position(copy, at.with_height(0.0));
            }
            copy
        } else {
            let highlight = self.state.add_highlight(HighlightKind::Source, source);
            self.state.highlights.source = Some(highlight);
            visual
        };
        debug!("Dragging {piece} from {source}");
        self.state.drag = Some(DragSession {
            source,
            piece,
            location: source.into(),
            visual,
            grab_offset: target.grab_offset,
            plane_height: target.point.y,
        });
        self.state.hover = Location::Offboard;
        self.state.scene.request_render();
        true
    }

    pub fn pointer_move(&mut self, screen: ScreenPoint) {
        if self.state.destroyed {
            return;
        }
        if self.state.drag.is_none() {
            self.update_hover(screen);
            return;
        }
        let Some(previous_location) = self.relocate_dragged_piece(screen) else {
            return;
        };
        let Some(drag) = self.state.drag else {
            return;
        };
        let event = DragMoveEvent {
            location: drag.location,
            previous_location,
            source: drag.source,
            piece: drag.piece,
            position: &*self.state.position,
            orientation: self.state.orientation,
        };
        self.state.hooks.drag_move(&event);
    }

    // Releases the dragged piece, if any.
    pub fn pointer_up(&mut self, screen: ScreenPoint, now: AnimationInstant) {
        if self.state.destroyed || self.state.drag.is_none() {
            return;
        }
        self.relocate_dragged_piece(screen);
        self.stop_dragged_piece(now);
    }

    // Moves the dragged visual under the pointer and updates the drop location and highlights.
    // A pointer ray that misses the drag plane leaves the visual in place and means offboard.
    // Returns the previous location, or `None` if nothing is dragged.
    fn relocate_dragged_piece(&mut self, screen: ScreenPoint) -> Option<Location> {
        let state = &mut self.state;
        let drag = state.drag?;
        let location = match state.scene.project_onto_plane(screen, drag.plane_height) {
            Some(point) => {
                let height = state.scene.visual_position(drag.visual).map_or(0.0, |at| at.y);
                let center = WorldPoint::new(
                    point.x - drag.grab_offset.x,
                    height,
                    point.z - drag.grab_offset.z,
                );
                state.scene.set_visual_position(drag.visual, center);
                state.geometry.locate(center.with_height(0.0), state.config.spare_pieces)
            }
            None => Location::Offboard,
        };
        if location != drag.location {
            state.remove_destination_highlight();
            if let Some(coord) = location.coord() {
                if Square::Board(coord) != drag.source {
                    let highlight = state.add_highlight(HighlightKind::Destination, coord.into());
                    state.highlights.destination = Some(highlight);
                }
            }
        }
        if let Some(session) = &mut state.drag {
            session.location = location;
        }
        state.scene.request_render();
        Some(drag.location)
    }

    fn update_hover(&mut self, screen: ScreenPoint) {
        if !self.state.hooks.has_hover_hooks() {
            return;
        }
        let location = self.pick(screen).location;
        if location == self.state.hover {
            return;
        }
        let previous = std::mem::replace(&mut self.state.hover, location);
        let state = &mut self.state;
        if let Some(square) = previous.coord() {
            let event = SquareHoverEvent {
                square,
                piece: state.position.get(square),
                position: &*state.position,
                orientation: state.orientation,
            };
            state.hooks.mouseout_square(&event);
        }
        if let Some(square) = location.coord() {
            let event = SquareHoverEvent {
                square,
                piece: state.position.get(square),
                position: &*state.position,
                orientation: state.orientation,
            };
            state.hooks.mouseover_square(&event);
        }
    }

    fn stop_dragged_piece(&mut self, now: AnimationInstant) {
        let Some(drag) = self.state.drag.take() else {
            return;
        };
        let mut action = match drag.location.coord() {
            Some(coord) => DropAction::Drop(coord),
            None => match self.state.config.drop_off_board {
                DropOffBoard::Snapback => DropAction::Snapback,
                DropOffBoard::Trash => DropAction::Trash,
            },
        };
        if self.state.hooks.on_drop.is_some() {
            let old_position = (*self.state.position).clone();
            let new_position = position_after_drop(&old_position, &drag);
            let event = DropEvent {
                source: drag.source,
                target: drag.location,
                piece: drag.piece,
                new_position: &new_position,
                old_position: &old_position,
                orientation: self.state.orientation,
            };
            match self.state.hooks.drop_piece(&event) {
                DropResponse::Default => {}
                DropResponse::Snapback => action = DropAction::Snapback,
                DropResponse::Trash => action = DropAction::Trash,
            }
        }
        debug!("Drag {} -> {} resolved as {action:?}", drag.source, drag.location);
        self.state.remove_all_highlights();
        match action {
            DropAction::Drop(target) => self.drop_dragged_piece(drag, target, now),
            DropAction::Snapback => self.snapback_dragged_piece(drag, now),
            DropAction::Trash => self.trash_dragged_piece(drag),
        }
        self.state.scene.request_render();
        self.process_pending(now);
    }

    fn drop_dragged_piece(&mut self, drag: DragSession, target: Coord, now: AnimationInstant) {
        let state = &mut self.state;
        let target_square = Square::Board(target);
        let center = state.square_center(target_square);
        let visual = if state.scene.has_visual(drag.visual) {
            drag.visual
        } else {
            state.scene.add_piece_visual(drag.piece, center)
        };
        let mut new_position = (*state.position).clone();
        if drag.source.is_ordinary() {
            new_position.remove(drag.source);
            state.unregister_if(drag.source, drag.visual);
        }
        if new_position.contains(target) {
            if let Some(replaced) = state.visuals.get(&target_square).copied() {
                if replaced != visual {
                    state.scene.remove_visual(replaced);
                }
            }
        }
        new_position.insert(target, drag.piece);
        state.visuals.insert(target_square, visual);
        state.set_current_position(new_position);

        let start = state.scene.visual_position(visual).unwrap_or(center);
        let event = SnapEndEvent { source: drag.source, target: target_square, piece: drag.piece };
        let duration = state.duration(AnimationKind::Snap);
        self.scheduler.start_tween(
            &mut self.state,
            now,
            duration,
            move |state, t| {
                state.scene.set_visual_position(visual, slide(start, center, t));
                state.scene.request_render();
            },
            move |state| state.hooks.snap_end(event),
        );
    }

    fn snapback_dragged_piece(&mut self, drag: DragSession, now: AnimationInstant) {
        if drag.source.is_spare() {
            self.state.scene.remove_visual(drag.visual);
            return;
        }
        let target = self.state.square_center(drag.source);
        let start = self.state.scene.visual_position(drag.visual).unwrap_or(target);
        let duration = self.state.duration(AnimationKind::Snapback);
        self.scheduler.start_tween(
            &mut self.state,
            now,
            duration,
            move |state, t| {
                state.scene.set_visual_position(drag.visual, slide(start, target, t));
                state.scene.request_render();
            },
            move |state| {
                let event = SnapbackEndEvent {
                    piece: drag.piece,
                    source: drag.source,
                    position: &*state.position,
                    orientation: state.orientation,
                };
                state.hooks.snapback_end(&event);
            },
        );
    }

    fn trash_dragged_piece(&mut self, drag: DragSession) {
        let state = &mut self.state;
        state.scene.remove_visual(drag.visual);
        if drag.source.is_ordinary() {
            let mut new_position = (*state.position).clone();
            new_position.remove(drag.source);
            state.visuals.remove(&drag.source);
            state.set_current_position(new_position);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn drag(source: &str, location: Location) -> DragSession {
        DragSession {
            source: Square::from_algebraic(source).unwrap(),
            piece: PieceCode::from_code("wQ").unwrap(),
            location,
            visual: VisualId(0),
            grab_offset: WorldPoint::default(),
            plane_height: 0.0,
        }
    }

    #[test]
    fn speculative_drop_positions() {
        let mut position = Position::new();
        position.insert(Coord::D1, PieceCode::from_code("wQ").unwrap());

        let on_board = position_after_drop(&position, &drag("d1", Coord::D4.into()));
        assert_eq!(on_board.get(Coord::D1), None);
        assert_eq!(on_board.get(Coord::D4).unwrap().to_code(), "wQ");

        let off_board = position_after_drop(&position, &drag("d1", Location::Offboard));
        assert!(off_board.is_empty());

        let from_spare = position_after_drop(&position, &drag("sw2", Coord::E4.into()));
        assert_eq!(from_spare.len(), 2);

        let spare_to_spare =
            position_after_drop(&position, &drag("sw2", Square::from_algebraic("sb1").unwrap().into()));
        assert_eq!(spare_to_spare, position);
    }
}
