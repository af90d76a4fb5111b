use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use crate::error::BoardError;
use crate::force::Force;


// Which side sits at the bottom of the screen.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrientationRequest {
    White,
    Black,
    Flip,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }

    pub fn bottom_force(self) -> Force {
        match self {
            Orientation::White => Force::White,
            Orientation::Black => Force::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Orientation::White => "white",
            Orientation::Black => "black",
        }
    }

    pub fn apply(self, request: OrientationRequest) -> Self {
        match request {
            OrientationRequest::White => Orientation::White,
            OrientationRequest::Black => Orientation::Black,
            OrientationRequest::Flip => self.flipped(),
        }
    }
}

impl OrientationRequest {
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        match s {
            "white" => Ok(OrientationRequest::White),
            "black" => Ok(OrientationRequest::Black),
            "flip" => Ok(OrientationRequest::Flip),
            _ => Err(BoardError::InvalidOrientation(s.to_owned())),
        }
    }
}


// Screen-space square coordinates: (0, 0) is the top-left square as the viewer sees it, which
// is a8 for white orientation and h1 for black orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayCoord {
    pub x: u8,
    pub y: u8,
}

pub fn to_display_coord(coord: Coord, orientation: Orientation) -> DisplayCoord {
    match orientation {
        Orientation::White => DisplayCoord {
            x: coord.col.to_zero_based(),
            y: NUM_ROWS - coord.row.to_zero_based() - 1,
        },
        Orientation::Black => DisplayCoord {
            x: NUM_COLS - coord.col.to_zero_based() - 1,
            y: coord.row.to_zero_based(),
        },
    }
}

pub fn from_display_coord(q: DisplayCoord, orientation: Orientation) -> Option<Coord> {
    if q.x >= NUM_COLS || q.y >= NUM_ROWS {
        return None;
    }
    let (col, row) = match orientation {
        Orientation::White => (q.x, NUM_ROWS - q.y - 1),
        Orientation::Black => (NUM_COLS - q.x - 1, q.y),
    };
    Some(Coord::new(Col::from_zero_based(col), Row::from_zero_based(row)))
}


#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn display_coord_inverse() {
        for orientation in Orientation::iter() {
            for coord in Coord::all() {
                let q = to_display_coord(coord, orientation);
                assert_eq!(from_display_coord(q, orientation), Some(coord));
            }
        }
        assert_eq!(to_display_coord(Coord::A8, Orientation::White), DisplayCoord { x: 0, y: 0 });
        assert_eq!(to_display_coord(Coord::H1, Orientation::Black), DisplayCoord { x: 0, y: 0 });
        assert_eq!(from_display_coord(DisplayCoord { x: 8, y: 0 }, Orientation::White), None);
    }

    #[test]
    fn orientation_requests() {
        assert_eq!(Orientation::White.apply(OrientationRequest::Flip), Orientation::Black);
        assert_eq!(Orientation::Black.apply(OrientationRequest::Black), Orientation::Black);
        assert_eq!(OrientationRequest::parse("flip"), Ok(OrientationRequest::Flip));
        assert_eq!(
            OrientationRequest::parse("sideways"),
            Err(BoardError::InvalidOrientation("sideways".to_owned()))
        );
    }
}
