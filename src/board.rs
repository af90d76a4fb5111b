// Board controller: owns the canonical position and the visual registry, turns position requests
// into animation batches and commits them once every animation has finished.
//
// A new position is committed in one step after all operations of its batch complete. Requests
// that arrive while a batch is in flight, or before assets are loaded, are queued and applied in
// order afterwards.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use enum_map::EnumMap;
use itertools::Itertools;
use log::{debug, info, warn};

use crate::clock::AnimationInstant;
use crate::config::{AnimationKind, BoardConfig, ShowErrors};
use crate::coord::{Coord, Location, SpareSquare, Square};
use crate::diff::{self, Operation};
use crate::dirty::Dirty;
use crate::display::{Orientation, OrientationRequest};
use crate::drag::DragSession;
use crate::error::BoardError;
use crate::geometry::BoardGeometry;
use crate::hooks::BoardHooks;
use crate::piece::PieceCode;
use crate::position::{BoardMove, Position, PositionSource};
use crate::scene::{HighlightKind, Picker, Scene, VisualId, WorldPoint};
use crate::tween::Scheduler;
use crate::util::lerp;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Readiness {
    AssetsPending,
    Ready,
}

#[derive(Clone, Debug)]
struct PendingRequest {
    position: Position,
    animate: bool,
}

// Animations started by one position change. `new` becomes canonical when `remaining` drops
// to zero.
#[derive(Clone, Debug)]
pub(crate) struct Batch {
    remaining: usize,
    old: Position,
    new: Position,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Highlights {
    pub source: Option<VisualId>,
    pub destination: Option<VisualId>,
    pub user: Vec<VisualId>,
}

// Everything that tween callbacks may touch. Kept apart from the scheduler so that callbacks
// can borrow it mutably while the scheduler runs.
pub(crate) struct BoardState<R> {
    pub scene: R,
    pub config: BoardConfig,
    pub durations: EnumMap<AnimationKind, Duration>,
    pub geometry: BoardGeometry,
    pub hooks: BoardHooks,
    pub position: Dirty<Position>,
    pub orientation: Orientation,
    // Visual of every piece on the board, keyed by the square it rests on. Pieces in flight
    // stay registered at their source until their animation ends.
    pub visuals: HashMap<Square, VisualId>,
    // Spare tray pieces. Never part of the position.
    pub tray: HashMap<SpareSquare, VisualId>,
    pub highlights: Highlights,
    pub batch: Option<Batch>,
    pub drag: Option<DragSession>,
    pub hover: Location,
    pending: VecDeque<PendingRequest>,
    readiness: Readiness,
    pub destroyed: bool,
}

pub struct Board<R: Scene + Picker + 'static> {
    pub(crate) scheduler: Scheduler<BoardState<R>>,
    pub(crate) state: BoardState<R>,
}


impl<R: Scene> BoardState<R> {
    pub fn report(&mut self, err: BoardError) {
        if let Some(hook) = &mut self.hooks.on_error {
            hook(&err);
            return;
        }
        match self.config.show_errors {
            ShowErrors::Silent => {}
            ShowErrors::Log => warn!("{err}"),
        }
    }

    pub fn duration(&self, kind: AnimationKind) -> Duration { self.durations[kind] }

    pub fn square_center(&self, square: Square) -> WorldPoint { self.geometry.square_center(square) }

    // Replaces the canonical position. `on_change` fires only if the FEN changes.
    pub fn set_current_position(&mut self, new: Position) {
        let old_fen = self.position.to_fen();
        let new_fen = new.to_fen();
        let old = self.position.replace(new);
        if old_fen != new_fen {
            info!("Position changed: {old_fen} -> {new_fen}");
            self.hooks.change(&old, &self.position);
        }
    }

    fn draw_spare_pieces(&mut self) {
        for spare in SpareSquare::all() {
            let at = self.square_center(spare.into());
            let visual = self.scene.add_piece_visual(spare.piece(), at);
            self.tray.insert(spare, visual);
        }
    }

    // Rebuilds all piece visuals from the canonical position.
    pub fn draw_position_instant(&mut self) {
        for (_, visual) in self.visuals.drain() {
            self.scene.remove_visual(visual);
        }
        let pieces = self.position.sorted_iter().collect_vec();
        for (square, piece) in pieces {
            self.add_registered_visual(square, piece);
        }
        self.scene.request_render();
    }

    fn add_registered_visual(&mut self, square: Square, piece: PieceCode) -> VisualId {
        let at = self.square_center(square);
        let visual = self.scene.add_piece_visual(piece, at);
        self.visuals.insert(square, visual);
        visual
    }

    // Live visual registered on `square`, if any.
    pub fn live_visual_on(&self, square: Square) -> Option<VisualId> {
        self.visuals.get(&square).copied().filter(|&visual| self.scene.has_visual(visual))
    }

    pub fn unregister_if(&mut self, square: Square, visual: VisualId) {
        if self.visuals.get(&square) == Some(&visual) {
            self.visuals.remove(&square);
        }
    }

    pub fn add_highlight(&mut self, kind: HighlightKind, square: Square) -> VisualId {
        let at = self.square_center(square);
        let visual = self.scene.add_highlight_visual(kind, at);
        self.scene.request_render();
        visual
    }

    pub fn remove_destination_highlight(&mut self) {
        if let Some(visual) = self.highlights.destination.take() {
            self.scene.remove_visual(visual);
        }
    }

    // Drops source, destination and user highlights alike.
    pub fn remove_all_highlights(&mut self) {
        let Highlights { source, destination, user } = std::mem::take(&mut self.highlights);
        for visual in source.into_iter().chain(destination).chain(user) {
            self.scene.remove_visual(visual);
        }
        self.scene.request_render();
    }

    // Counts down the current batch and commits it after its last operation.
    fn complete_operation(&mut self) {
        let Some(batch) = &mut self.batch else {
            warn!("{}", crate::internal_error_message!("operation completed without a batch"));
            return;
        };
        batch.remaining = batch.remaining.saturating_sub(1);
        if batch.remaining > 0 {
            return;
        }
        if let Some(batch) = self.batch.take() {
            self.commit_batch(batch);
        }
    }

    fn commit_batch(&mut self, batch: Batch) {
        debug!("Animation batch finished");
        self.set_current_position(batch.new.clone());
        self.hooks.move_end(&batch.old, &batch.new);
        self.scene.request_render();
        self.check_consistency();
    }

    // Compares the visual registry against the canonical position. Missing visuals are
    // recreated, live orphaned ones are only reported. Stale entries are dropped.
    pub fn check_consistency(&mut self) {
        let registered = self
            .visuals
            .iter()
            .filter(|(square, _)| square.is_ordinary())
            .map(|(&square, &visual)| (square, visual))
            .sorted()
            .collect_vec();
        for (square, visual) in registered {
            match self.position.get(square) {
                None => {
                    if self.scene.has_visual(visual) {
                        self.report(BoardError::VisualOrphaned(square));
                    } else {
                        self.visuals.remove(&square);
                    }
                }
                Some(piece) => {
                    if !self.scene.has_visual(visual) {
                        self.report(BoardError::VisualMissing(square));
                        self.add_registered_visual(square, piece);
                    }
                }
            }
        }
        let unregistered = self
            .position
            .sorted_iter()
            .filter(|(square, _)| !self.visuals.contains_key(square))
            .collect_vec();
        for (square, piece) in unregistered {
            self.report(BoardError::PositionWithoutVisual(square));
            self.add_registered_visual(square, piece);
        }
    }
}


impl<R: Scene + Picker + 'static> Board<R> {
    pub fn new(scene: R, config: BoardConfig, hooks: BoardHooks) -> Self {
        Self::with_geometry(scene, config, BoardGeometry::default(), hooks)
    }

    pub fn with_geometry(
        scene: R, config: BoardConfig, geometry: BoardGeometry, hooks: BoardHooks,
    ) -> Self {
        let config = config.normalized();
        let durations = config.durations();
        let orientation = config.orientation;
        let mut state = BoardState {
            scene,
            config,
            durations,
            geometry,
            hooks,
            position: Dirty::new(Position::new()),
            orientation,
            visuals: HashMap::new(),
            tray: HashMap::new(),
            highlights: Highlights::default(),
            batch: None,
            drag: None,
            hover: Location::Offboard,
            pending: VecDeque::new(),
            readiness: Readiness::AssetsPending,
            destroyed: false,
        };
        if let Some(initial) = state.config.position.clone() {
            match initial.resolve() {
                Ok(position) => state.position = Dirty::new(position),
                Err(err) => state.report(err),
            }
        }
        state.scene.swivel_camera(orientation);
        let mut board = Board { scheduler: Scheduler::new(), state };
        board.assets_loaded(AnimationInstant::EPOCH);
        board
    }

    pub fn scene(&self) -> &R { &self.state.scene }
    pub fn scene_mut(&mut self) -> &mut R { &mut self.state.scene }
    pub fn config(&self) -> &BoardConfig { &self.state.config }
    pub fn geometry(&self) -> &BoardGeometry { &self.state.geometry }
    pub fn hooks_mut(&mut self) -> &mut BoardHooks { &mut self.state.hooks }

    // The committed position. During an animation this is still the position from before it.
    pub fn position(&self) -> &Position { &*self.state.position }
    pub fn fen(&self) -> String { self.state.position.to_fen() }
    // Whether the committed position changed since the last call.
    pub fn take_position_dirt(&self) -> bool { self.state.position.take_dirt() }

    pub fn readiness(&self) -> Readiness { self.state.readiness }
    pub fn is_animating(&self) -> bool {
        self.state.batch.is_some() || !self.scheduler.is_idle()
    }
    pub fn is_dragging(&self) -> bool { self.state.drag.is_some() }
    pub fn num_pending_requests(&self) -> usize { self.state.pending.len() }

    // Visual currently registered for a square, even if the scene no longer has it.
    pub fn visual_on(&self, square: impl Into<Square>) -> Option<VisualId> {
        self.state.visuals.get(&square.into()).copied()
    }

    pub fn set_position(&mut self, source: PositionSource, animate: bool, now: AnimationInstant) {
        match source.resolve() {
            Ok(position) => self.request_position(position, animate, now),
            Err(err) => self.state.report(err),
        }
    }

    // Accepts "start", a FEN or a JSON object.
    pub fn set_position_str(&mut self, s: &str, animate: bool, now: AnimationInstant) {
        match PositionSource::parse(s) {
            Ok(source) => self.set_position(source, animate, now),
            Err(err) => self.state.report(err),
        }
    }

    pub fn start(&mut self, animate: bool, now: AnimationInstant) {
        self.set_position(PositionSource::Start, animate, now);
    }

    pub fn clear(&mut self, animate: bool, now: AnimationInstant) {
        self.request_position(Position::new(), animate, now);
    }

    // Applies "src-dst" moves to the most recently requested position and requests the result.
    // Invalid move strings are reported and skipped. A later move from the same square overrides
    // an earlier one.
    pub fn move_pieces(&mut self, moves: &[&str], animate: bool, now: AnimationInstant) -> Position {
        let base = self.latest_requested_position().clone();
        if moves.is_empty() {
            return base;
        }
        let mut parsed = Vec::new();
        for &notation in moves {
            match BoardMove::from_notation(notation) {
                Some(m) => parsed.push(m),
                None => self.state.report(BoardError::InvalidMove(notation.to_owned())),
            }
        }
        let new_position = base.with_moves(&parsed);
        self.request_position(new_position.clone(), animate, now);
        new_position
    }

    pub fn orientation(&self) -> Orientation { self.state.orientation }

    pub fn set_orientation(&mut self, request: OrientationRequest) -> Orientation {
        self.state.orientation = self.state.orientation.apply(request);
        self.state.scene.swivel_camera(self.state.orientation);
        self.state.scene.request_render();
        self.state.orientation
    }

    // Accepts "white", "black" or "flip". Anything else is reported and ignored.
    pub fn set_orientation_str(&mut self, s: &str) -> Orientation {
        match OrientationRequest::parse(s) {
            Ok(request) => self.set_orientation(request),
            Err(err) => {
                self.state.report(err);
                self.state.orientation
            }
        }
    }

    pub fn flip(&mut self) -> Orientation { self.set_orientation(OrientationRequest::Flip) }

    pub fn add_highlight(&mut self, square: Coord) {
        let visual = self.state.add_highlight(HighlightKind::User, square.into());
        self.state.highlights.user.push(visual);
    }

    pub fn clear_highlights(&mut self) {
        for visual in std::mem::take(&mut self.state.highlights.user) {
            self.state.scene.remove_visual(visual);
        }
        self.state.scene.request_render();
    }

    pub fn resize(&mut self) {
        self.state.scene.resize();
        self.state.scene.request_render();
    }

    pub fn rerender(&mut self) { self.state.scene.request_render(); }

    // Tears down the scene. Pointer events and ticks are ignored afterwards.
    pub fn destroy(&mut self) {
        if self.state.destroyed {
            return;
        }
        self.state.drag = None;
        self.state.destroyed = true;
        self.state.scene.destroy();
    }

    // Advances animations. Call once per rendered frame.
    pub fn tick(&mut self, now: AnimationInstant) {
        if self.state.destroyed {
            return;
        }
        self.scheduler.tick(&mut self.state, now);
        self.process_pending(now);
    }

    // Signals that the scene finished loading its assets. Draws the board and applies queued
    // requests. No-op if the scene still reports assets as missing.
    pub fn assets_loaded(&mut self, now: AnimationInstant) {
        if self.state.readiness == Readiness::Ready || !self.state.scene.assets_loaded() {
            return;
        }
        debug!("Board assets loaded");
        self.state.readiness = Readiness::Ready;
        if self.state.config.spare_pieces {
            self.state.draw_spare_pieces();
        }
        self.state.draw_position_instant();
        self.process_pending(now);
    }

    fn latest_requested_position(&self) -> &Position {
        if let Some(request) = self.state.pending.back() {
            &request.position
        } else if let Some(batch) = &self.state.batch {
            &batch.new
        } else {
            &*self.state.position
        }
    }

    fn request_position(&mut self, position: Position, animate: bool, now: AnimationInstant) {
        self.state.pending.push_back(PendingRequest { position, animate });
        self.process_pending(now);
    }

    // Whether a position request has to wait. Requests never interleave with a batch, a drag
    // or a settling dragged piece.
    fn must_defer_requests(&self) -> bool {
        self.state.readiness != Readiness::Ready
            || self.state.batch.is_some()
            || self.state.drag.is_some()
            || !self.scheduler.is_idle()
    }

    // Whether a batch is running or queued.
    pub(crate) fn has_position_requests_in_flight(&self) -> bool {
        self.state.batch.is_some() || !self.state.pending.is_empty()
    }

    pub(crate) fn process_pending(&mut self, now: AnimationInstant) {
        while !self.must_defer_requests() {
            let Some(request) = self.state.pending.pop_front() else {
                break;
            };
            self.apply_request(request, now);
        }
    }

    fn apply_request(&mut self, request: PendingRequest, now: AnimationInstant) {
        if !request.animate {
            self.state.set_current_position(request.position);
            self.state.draw_position_instant();
            return;
        }
        let operations = diff::plan(&self.state.position, &request.position);
        if operations.is_empty() {
            return;
        }
        debug!("Starting animation batch: {operations:?}");
        self.state.batch = Some(Batch {
            remaining: operations.len(),
            old: (*self.state.position).clone(),
            new: request.position,
        });
        for op in diff::execution_order(&operations) {
            self.start_operation(op, now);
        }
    }

    fn start_operation(&mut self, op: Operation, now: AnimationInstant) {
        match op {
            Operation::Clear { square, .. } => self.animate_fade_out(square, now),
            Operation::Move { source, destination, .. } => {
                match self.state.live_visual_on(source) {
                    Some(visual) => self.animate_slide(visual, Some(source), destination, now),
                    None => self.skip_operation(source),
                }
            }
            Operation::Add { square, piece } => {
                let tray_visual = if self.state.config.spare_pieces {
                    self.state
                        .tray
                        .get(&SpareSquare::for_piece(piece))
                        .copied()
                        .and_then(|visual| self.state.scene.clone_visual(visual))
                } else {
                    None
                };
                match tray_visual {
                    Some(visual) => self.animate_slide(visual, None, square, now),
                    None => self.animate_fade_in(square, piece, now),
                }
            }
        }
    }

    // An operation whose visual has vanished finishes at once so that the batch still commits.
    // The consistency check after the commit repairs the registry.
    fn skip_operation(&mut self, square: Square) {
        self.state.report(BoardError::VisualMissing(square));
        self.state.complete_operation();
    }

    fn animate_fade_out(&mut self, square: Square, now: AnimationInstant) {
        let Some(visual) = self.state.live_visual_on(square) else {
            self.skip_operation(square);
            return;
        };
        let duration = self.state.duration(AnimationKind::Trash);
        self.scheduler.start_tween(
            &mut self.state,
            now,
            duration,
            move |state: &mut BoardState<R>, t| {
                state.scene.set_visual_opacity(visual, 1.0 - t);
                state.scene.request_render();
            },
            move |state: &mut BoardState<R>| {
                state.scene.remove_visual(visual);
                state.unregister_if(square, visual);
                state.complete_operation();
            },
        );
    }

    fn animate_fade_in(&mut self, square: Square, piece: PieceCode, now: AnimationInstant) {
        let at = self.state.square_center(square);
        let visual = self.state.scene.add_piece_visual(piece, at);
        let duration = self.state.duration(AnimationKind::Appear);
        self.scheduler.start_tween(
            &mut self.state,
            now,
            duration,
            move |state: &mut BoardState<R>, t| {
                state.scene.set_visual_opacity(visual, t);
                state.scene.request_render();
            },
            move |state: &mut BoardState<R>| {
                state.visuals.insert(square, visual);
                state.complete_operation();
            },
        );
    }

    // Slides `visual` onto `destination`. `source` is the square the visual was registered on,
    // if any.
    fn animate_slide(
        &mut self, visual: VisualId, source: Option<Square>, destination: Square,
        now: AnimationInstant,
    ) {
        let target = self.state.square_center(destination);
        let start = self.state.scene.visual_position(visual).unwrap_or(target);
        let duration = self.state.duration(AnimationKind::Move);
        self.scheduler.start_tween(
            &mut self.state,
            now,
            duration,
            move |state: &mut BoardState<R>, t| {
                let at = WorldPoint::new(
                    lerp(start.x, target.x, t),
                    lerp(start.y, target.y, t),
                    lerp(start.z, target.z, t),
                );
                state.scene.set_visual_position(visual, at);
                state.scene.request_render();
            },
            move |state: &mut BoardState<R>| {
                state.visuals.insert(destination, visual);
                if let Some(source) = source {
                    if source != destination {
                        state.unregister_if(source, visual);
                    }
                }
                state.complete_operation();
            },
        );
    }
}
