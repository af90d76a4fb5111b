// Scene without a renderer: keeps visuals in memory and picks with an orthographic top-down
// camera. Used by the console front-end and by tests.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::display::Orientation;
use crate::piece::PieceCode;
use crate::scene::{HighlightKind, PieceHit, Picker, Scene, ScreenPoint, VisualId, WorldPoint};


#[derive(Clone, Copy, PartialEq, Debug)]
pub enum VisualKind {
    Piece(PieceCode),
    Highlight(HighlightKind),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct HeadlessVisual {
    pub kind: VisualKind,
    pub position: WorldPoint,
    pub opacity: f64,
}

#[derive(Clone, Debug)]
pub struct HeadlessScene {
    visuals: BTreeMap<VisualId, HeadlessVisual>,
    next_id: u64,
    assets_loaded: bool,
    orientation: Orientation,
    // Screen covers `-half_extent..half_extent` world units along both axes.
    half_extent: f64,
    pixels_per_unit: f64,
    // Half-width of a piece's footprint.
    piece_radius: f64,
    render_requests: usize,
    destroyed: bool,
}

impl HeadlessScene {
    pub fn new() -> Self {
        HeadlessScene {
            visuals: BTreeMap::new(),
            next_id: 1,
            assets_loaded: true,
            orientation: Orientation::White,
            half_extent: 14.0,
            pixels_per_unit: 10.0,
            piece_radius: 0.8,
            render_requests: 0,
            destroyed: false,
        }
    }

    // A scene whose assets are still loading. Call `finish_loading` to complete.
    pub fn loading() -> Self { HeadlessScene { assets_loaded: false, ..HeadlessScene::new() } }
    pub fn finish_loading(&mut self) { self.assets_loaded = true; }

    pub fn visual(&self, id: VisualId) -> Option<&HeadlessVisual> { self.visuals.get(&id) }

    pub fn pieces(&self) -> impl Iterator<Item = (VisualId, PieceCode, &HeadlessVisual)> + '_ {
        self.visuals.iter().filter_map(|(&id, visual)| match visual.kind {
            VisualKind::Piece(piece) => Some((id, piece, visual)),
            VisualKind::Highlight(_) => None,
        })
    }

    pub fn highlights(&self) -> Vec<(HighlightKind, WorldPoint)> {
        self.visuals
            .values()
            .filter_map(|visual| match visual.kind {
                VisualKind::Highlight(kind) => Some((kind, visual.position)),
                VisualKind::Piece(_) => None,
            })
            .collect_vec()
    }

    pub fn num_visuals(&self) -> usize { self.visuals.len() }
    pub fn orientation(&self) -> Orientation { self.orientation }
    pub fn is_destroyed(&self) -> bool { self.destroyed }

    // Number of render requests since the last call.
    pub fn take_render_requests(&mut self) -> usize { std::mem::take(&mut self.render_requests) }

    pub fn screen_size(&self) -> f64 { 2.0 * self.half_extent * self.pixels_per_unit }

    // Where a world point appears on screen.
    pub fn screen_point(&self, at: WorldPoint) -> ScreenPoint {
        let (x, z) = match self.orientation {
            Orientation::White => (at.x, at.z),
            Orientation::Black => (-at.x, -at.z),
        };
        ScreenPoint {
            x: (x + self.half_extent) * self.pixels_per_unit,
            y: (z + self.half_extent) * self.pixels_per_unit,
        }
    }

    fn world_point(&self, screen: ScreenPoint) -> Option<(f64, f64)> {
        let size = self.screen_size();
        if !(0.0..=size).contains(&screen.x) || !(0.0..=size).contains(&screen.y) {
            return None;
        }
        let x = screen.x / self.pixels_per_unit - self.half_extent;
        let z = screen.y / self.pixels_per_unit - self.half_extent;
        Some(match self.orientation {
            Orientation::White => (x, z),
            Orientation::Black => (-x, -z),
        })
    }

    fn add_visual(&mut self, kind: VisualKind, at: WorldPoint) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.visuals.insert(id, HeadlessVisual { kind, position: at, opacity: 1.0 });
        id
    }
}

impl Scene for HeadlessScene {
    fn assets_loaded(&self) -> bool { self.assets_loaded }

    fn add_piece_visual(&mut self, piece: PieceCode, at: WorldPoint) -> VisualId {
        self.add_visual(VisualKind::Piece(piece), at)
    }

    fn clone_visual(&mut self, visual: VisualId) -> Option<VisualId> {
        let original = *self.visuals.get(&visual)?;
        let id = self.add_visual(original.kind, original.position);
        if let Some(copy) = self.visuals.get_mut(&id) {
            copy.opacity = original.opacity;
        }
        Some(id)
    }

    fn add_highlight_visual(&mut self, kind: HighlightKind, at: WorldPoint) -> VisualId {
        self.add_visual(VisualKind::Highlight(kind), at)
    }

    fn remove_visual(&mut self, visual: VisualId) { self.visuals.remove(&visual); }

    fn has_visual(&self, visual: VisualId) -> bool { self.visuals.contains_key(&visual) }

    fn visual_position(&self, visual: VisualId) -> Option<WorldPoint> {
        self.visuals.get(&visual).map(|v| v.position)
    }

    fn set_visual_position(&mut self, visual: VisualId, at: WorldPoint) {
        if let Some(v) = self.visuals.get_mut(&visual) {
            v.position = at;
        }
    }

    fn set_visual_opacity(&mut self, visual: VisualId, opacity: f64) {
        if let Some(v) = self.visuals.get_mut(&visual) {
            v.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn swivel_camera(&mut self, orientation: Orientation) { self.orientation = orientation; }
    fn resize(&mut self) {}
    fn request_render(&mut self) { self.render_requests += 1; }
    fn destroy(&mut self) {
        self.visuals.clear();
        self.destroyed = true;
    }
}

impl Picker for HeadlessScene {
    // Top-down camera: the highest piece is the nearest one. Among equally high pieces the most
    // recently added is drawn on top.
    fn pick_visual(&self, screen: ScreenPoint, candidates: &[VisualId]) -> Option<PieceHit> {
        let (x, z) = self.world_point(screen)?;
        candidates
            .iter()
            .filter_map(|&id| Some((id, self.visuals.get(&id)?)))
            .filter(|(_, visual)| matches!(visual.kind, VisualKind::Piece(_)))
            .filter(|(_, visual)| {
                (visual.position.x - x).abs() <= self.piece_radius
                    && (visual.position.z - z).abs() <= self.piece_radius
            })
            .max_by(|(id_a, a), (id_b, b)| {
                a.position.y.total_cmp(&b.position.y).then(id_a.cmp(id_b))
            })
            .map(|(id, visual)| PieceHit {
                visual: id,
                point: WorldPoint::new(x, visual.position.y, z),
            })
    }

    fn project_onto_plane(&self, screen: ScreenPoint, height: f64) -> Option<WorldPoint> {
        let (x, z) = self.world_point(screen)?;
        Some(WorldPoint::new(x, height, z))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_round_trip() {
        let mut scene = HeadlessScene::new();
        for orientation in [Orientation::White, Orientation::Black] {
            scene.swivel_camera(orientation);
            let at = WorldPoint::on_plane(3.0, -5.0);
            let projected = scene.project_onto_plane(scene.screen_point(at), 0.0).unwrap();
            assert!((projected.x - at.x).abs() < 1e-9);
            assert!((projected.z - at.z).abs() < 1e-9);
        }
        assert_eq!(scene.project_onto_plane(ScreenPoint { x: -1.0, y: 0.0 }, 0.0), None);
    }

    #[test]
    fn picks_highest_piece() {
        let mut scene = HeadlessScene::new();
        let queen = PieceCode::from_code("wQ").unwrap();
        let low = scene.add_piece_visual(queen, WorldPoint::on_plane(0.0, 0.0));
        let high = scene.add_piece_visual(queen, WorldPoint::new(0.5, 1.0, 0.0));
        let screen = scene.screen_point(WorldPoint::on_plane(0.2, 0.0));
        assert_eq!(scene.pick_visual(screen, &[low, high]).unwrap().visual, high);
        assert_eq!(scene.pick_visual(screen, &[low]).unwrap().visual, low);
        let far = scene.screen_point(WorldPoint::on_plane(5.0, 5.0));
        assert_eq!(scene.pick_visual(far, &[low, high]), None);
    }
}
