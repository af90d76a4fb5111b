#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod clock;
pub mod config;
pub mod coord;
pub mod diff;
pub mod dirty;
pub mod display;
pub mod drag;
pub mod error;
pub mod fen;
pub mod force;
pub mod geometry;
pub mod headless;
pub mod hooks;
pub mod piece;
pub mod position;
pub mod scene;
pub mod test_util;
pub mod tween;
pub mod util;
