// What to put in prelude? Board concepts the console front-end works with directly: positions,
// squares, pieces, the board controller and its headless scene. Auxiliary modules (tweens,
// geometry internals, utils) remain behind namespaces.

pub use board3d::board::*;
pub use board3d::config::*;
pub use board3d::coord::*;
pub use board3d::diff::*;
pub use board3d::display::*;
pub use board3d::error::*;
pub use board3d::fen::*;
pub use board3d::force::*;
pub use board3d::headless::*;
pub use board3d::hooks::*;
pub use board3d::piece::*;
pub use board3d::position::*;
