use std::collections::HashMap;
use std::time::Duration;

use enum_map::{Enum, EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::display::Orientation;
use crate::error::BoardError;
use crate::position::{Position, PositionSource};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Enum)]
pub enum AnimationKind {
    Appear,   // piece fading in, or sliding in from a spare tray
    Move,     // piece sliding between squares during a position change
    Snapback, // dragged piece returning to its source square
    Snap,     // dragged piece settling onto the drop square
    Trash,    // piece fading out
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Fast,
    Slow,
}

// Either a preset or an exact duration in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationSpeed {
    Preset(SpeedPreset),
    Millis(u64),
}

struct SpeedTable {
    normal: u64,
    slow: u64,
    fast: u64,
}

fn speed_table(kind: AnimationKind) -> SpeedTable {
    match kind {
        AnimationKind::Appear => SpeedTable { normal: 200, slow: 400, fast: 100 },
        AnimationKind::Move => SpeedTable { normal: 200, slow: 400, fast: 100 },
        AnimationKind::Snapback => SpeedTable { normal: 50, slow: 100, fast: 25 },
        AnimationKind::Snap => SpeedTable { normal: 25, slow: 50, fast: 10 },
        AnimationKind::Trash => SpeedTable { normal: 100, slow: 200, fast: 50 },
    }
}

impl AnimationSpeed {
    pub fn duration(self, kind: AnimationKind) -> Duration {
        let table = speed_table(kind);
        Duration::from_millis(match self {
            AnimationSpeed::Preset(SpeedPreset::Fast) => table.fast,
            AnimationSpeed::Preset(SpeedPreset::Slow) => table.slow,
            AnimationSpeed::Millis(ms) => ms,
        })
    }
}

pub fn default_duration(kind: AnimationKind) -> Duration {
    Duration::from_millis(speed_table(kind).normal)
}


// What happens to a piece released outside the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropOffBoard {
    #[default]
    Snapback,
    Trash,
}

// Where diagnostics go. A custom `on_error` hook, if installed, takes precedence.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowErrors {
    #[default]
    Silent,
    Log,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialPosition {
    // "start" or a FEN.
    Text(String),
    // Square -> piece code.
    Map(HashMap<String, String>),
}

impl InitialPosition {
    pub fn resolve(&self) -> Result<Position, BoardError> {
        let source = match self {
            InitialPosition::Text(s) => PositionSource::parse(s),
            InitialPosition::Map(map) => Position::from_string_map(map).map(PositionSource::from),
        };
        source
            .and_then(PositionSource::resolve)
            .map_err(|_| BoardError::InvalidConfigPosition(format!("{self:?}")))
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub orientation: Orientation,
    pub draggable: bool,
    pub drop_off_board: DropOffBoard,
    pub spare_pieces: bool,
    pub show_errors: ShowErrors,
    pub position: Option<InitialPosition>,
    pub appear_speed: Option<AnimationSpeed>,
    pub move_speed: Option<AnimationSpeed>,
    pub snapback_speed: Option<AnimationSpeed>,
    pub snap_speed: Option<AnimationSpeed>,
    pub trash_speed: Option<AnimationSpeed>,
}

impl BoardConfig {
    // Spare pieces are useless unless they can be dragged.
    pub fn normalized(mut self) -> Self {
        if self.spare_pieces {
            self.draggable = true;
        }
        self
    }

    pub fn durations(&self) -> EnumMap<AnimationKind, Duration> {
        let pick = |speed: Option<AnimationSpeed>, kind| {
            speed.map_or_else(|| default_duration(kind), |s| s.duration(kind))
        };
        enum_map! {
            AnimationKind::Appear => pick(self.appear_speed, AnimationKind::Appear),
            AnimationKind::Move => pick(self.move_speed, AnimationKind::Move),
            AnimationKind::Snapback => pick(self.snapback_speed, AnimationKind::Snapback),
            AnimationKind::Snap => pick(self.snap_speed, AnimationKind::Snap),
            AnimationKind::Trash => pick(self.trash_speed, AnimationKind::Trash),
        }
    }
}


#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::coord::Coord;

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.orientation, Orientation::White);
        assert!(!config.draggable);
        assert_eq!(config.drop_off_board, DropOffBoard::Snapback);
        let durations = config.durations();
        assert_eq!(durations[AnimationKind::Appear], Duration::from_millis(200));
        assert_eq!(durations[AnimationKind::Move], Duration::from_millis(200));
        assert_eq!(durations[AnimationKind::Snapback], Duration::from_millis(50));
        assert_eq!(durations[AnimationKind::Snap], Duration::from_millis(25));
        assert_eq!(durations[AnimationKind::Trash], Duration::from_millis(100));
    }

    #[test]
    fn spare_pieces_imply_draggable() {
        let config = BoardConfig { spare_pieces: true, ..BoardConfig::default() }.normalized();
        assert!(config.draggable);
    }

    #[test]
    fn parse_yaml() {
        let config: BoardConfig = serde_yaml::from_str(indoc! {"
            orientation: black
            draggable: true
            drop_off_board: trash
            position: start
            move_speed: slow
            trash_speed: fast
            appear_speed: 1000
        "})
        .unwrap();
        assert_eq!(config.orientation, Orientation::Black);
        assert_eq!(config.drop_off_board, DropOffBoard::Trash);
        assert_eq!(config.position.as_ref().unwrap().resolve(), Ok(Position::start()));
        let durations = config.durations();
        assert_eq!(durations[AnimationKind::Move], Duration::from_millis(400));
        assert_eq!(durations[AnimationKind::Trash], Duration::from_millis(50));
        assert_eq!(durations[AnimationKind::Appear], Duration::from_millis(1000));
        assert_eq!(durations[AnimationKind::Snap], Duration::from_millis(25));
    }

    #[test]
    fn position_map() {
        let config: BoardConfig = serde_yaml::from_str(indoc! {"
            position:
              e4: wK
              sw1: wK
        "})
        .unwrap();
        let position = config.position.unwrap().resolve().unwrap();
        assert_eq!(position.len(), 2);
        assert_eq!(position.get(Coord::E4).unwrap().to_code(), "wK");
    }

    #[test]
    fn invalid_position() {
        let config: BoardConfig = serde_yaml::from_str("position: not-a-fen").unwrap();
        let err = config.position.unwrap().resolve().unwrap_err();
        assert_eq!(err.code(), 7263);
    }

    #[test]
    fn negative_speed_is_rejected() {
        assert!(serde_yaml::from_str::<BoardConfig>("move_speed: -5").is_err());
        assert!(serde_yaml::from_str::<BoardConfig>("move_speed: medium").is_err());
    }
}
