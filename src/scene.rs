// Interfaces to the rendering side. The board never builds meshes, cameras or lights: it asks
// the scene to add, move, fade and remove opaque visuals, and asks the picker what is under the
// pointer.

use std::ops;

use serde::{Deserialize, Serialize};

use crate::display::Orientation;
use crate::piece::PieceCode;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VisualId(pub u64);

// World coordinates. The board lies in the `y = 0` plane, `x` grows from the a-file towards the
// h-file and `z` grows from rank 8 towards rank 1.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

// Pointer position in pixels relative to the top-left corner of the rendering surface.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum HighlightKind {
    Source,
    Destination,
    User,
}

// A ray hit on a piece visual.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PieceHit {
    pub visual: VisualId,
    pub point: WorldPoint,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self { WorldPoint { x, y, z } }
    pub fn on_plane(x: f64, z: f64) -> Self { WorldPoint { x, y: 0.0, z } }
    pub fn with_height(self, y: f64) -> Self { WorldPoint { y, ..self } }
}

impl ops::Sub for WorldPoint {
    type Output = WorldPoint;
    fn sub(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl ops::Add for WorldPoint {
    type Output = WorldPoint;
    fn add(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}


pub trait Scene {
    // False until piece geometry is available. Position requests are deferred until then.
    fn assets_loaded(&self) -> bool;

    fn add_piece_visual(&mut self, piece: PieceCode, at: WorldPoint) -> VisualId;
    // Copies a piece visual, e.g. to drag a piece out of a spare tray. `None` if `visual` is gone.
    fn clone_visual(&mut self, visual: VisualId) -> Option<VisualId>;
    fn add_highlight_visual(&mut self, kind: HighlightKind, at: WorldPoint) -> VisualId;
    // No-op if the visual does not exist.
    fn remove_visual(&mut self, visual: VisualId);
    fn has_visual(&self, visual: VisualId) -> bool;

    fn visual_position(&self, visual: VisualId) -> Option<WorldPoint>;
    fn set_visual_position(&mut self, visual: VisualId, at: WorldPoint);
    fn set_visual_opacity(&mut self, visual: VisualId, opacity: f64);

    fn swivel_camera(&mut self, orientation: Orientation);
    fn resize(&mut self);
    // Asks for a frame to be drawn. Implementations should coalesce repeated requests.
    fn request_render(&mut self);
    fn destroy(&mut self);
}

pub trait Picker {
    // Piece visuals under the pointer among `candidates`. When several overlap, returns the one
    // nearest to the viewer.
    fn pick_visual(&self, screen: ScreenPoint, candidates: &[VisualId]) -> Option<PieceHit>;

    // Intersection of the pointer ray with the horizontal plane at `height`. `None` if the ray
    // is parallel to the plane or misses the viewport.
    fn project_onto_plane(&self, screen: ScreenPoint, height: f64) -> Option<WorldPoint>;
}
