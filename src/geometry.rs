// Mapping between squares and world coordinates. The constants are presentation choices, so they
// are configurable rather than baked in.

use serde::{Deserialize, Serialize};

use crate::coord::{
    Col, Coord, Location, NUM_COLS, NUM_ROWS, NUM_SPARE_SLOTS, Row, SpareSquare, Square,
};
use crate::force::Force;
use crate::scene::WorldPoint;


#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardGeometry {
    // Side of a square in world units.
    pub square_size: f64,
    // Spare trays occupy `near..=far` squares away from the board centre along `z`.
    pub spare_tray_near: f64,
    pub spare_tray_far: f64,
    // Distance between adjacent tray slots, in squares.
    pub spare_slot_spacing: f64,
    // Tray pieces sit below the board surface.
    pub spare_height: f64,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        BoardGeometry {
            square_size: 2.0,
            spare_tray_near: 4.0,
            spare_tray_far: 6.0,
            spare_slot_spacing: 4.0 / 3.0,
            spare_height: -0.5,
        }
    }
}

impl BoardGeometry {
    fn tray_center(&self) -> f64 { (self.spare_tray_near + self.spare_tray_far) / 2.0 }

    // Tray slot 0 is the leftmost when viewed from the white side.
    fn slot_offset(&self, slot: u8) -> f64 {
        let mid = f64::from(NUM_SPARE_SLOTS - 1) / 2.0;
        (f64::from(slot) - mid) * self.spare_slot_spacing
    }

    pub fn square_center(&self, square: Square) -> WorldPoint {
        let s = self.square_size;
        match square {
            Square::Board(coord) => {
                let half_cols = f64::from(NUM_COLS) / 2.0;
                let half_rows = f64::from(NUM_ROWS) / 2.0;
                WorldPoint::on_plane(
                    s * (f64::from(coord.col.to_zero_based()) + 0.5 - half_cols),
                    s * (half_rows - 0.5 - f64::from(coord.row.to_zero_based())),
                )
            }
            Square::Spare(spare) => {
                let z = match spare.force {
                    Force::White => self.tray_center(),
                    Force::Black => -self.tray_center(),
                };
                WorldPoint::new(s * self.slot_offset(spare.slot_zero_based()), self.spare_height, s * z)
            }
        }
    }

    // Square under a point on the board plane. Spare slots are only considered when trays are
    // shown.
    pub fn locate(&self, point: WorldPoint, spare_pieces: bool) -> Location {
        let s = self.square_size;
        let u = point.x / s + f64::from(NUM_COLS) / 2.0;
        let v = f64::from(NUM_ROWS) / 2.0 - point.z / s;
        if (0.0..f64::from(NUM_COLS)).contains(&u) && (0.0..f64::from(NUM_ROWS)).contains(&v) {
            let coord = Coord::new(Col::from_zero_based(u as u8), Row::from_zero_based(v as u8));
            return coord.into();
        }
        if !spare_pieces {
            return Location::Offboard;
        }
        let depth = point.z / s;
        let force = if (self.spare_tray_near..=self.spare_tray_far).contains(&depth) {
            Force::White
        } else if (self.spare_tray_near..=self.spare_tray_far).contains(&-depth) {
            Force::Black
        } else {
            return Location::Offboard;
        };
        let mid = f64::from(NUM_SPARE_SLOTS - 1) / 2.0;
        let slot = (point.x / s / self.spare_slot_spacing + mid).round();
        if (0.0..f64::from(NUM_SPARE_SLOTS)).contains(&slot) {
            SpareSquare::all()
                .find(|sq| sq.force == force && f64::from(sq.slot_zero_based()) == slot)
                .map_or(Location::Offboard, |sq| Location::Square(sq.into()))
        } else {
            Location::Offboard
        }
    }
}
