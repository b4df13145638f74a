pub mod app;
pub mod config;
pub mod game;
pub mod highscore;
pub mod ui;

pub use config::{ARENA_H, ARENA_W, CELL_W, OverflowPolicy, Settings};
pub use game::{Arena, Game, GameEvent, Intent, Phase, Piece, Rotation, Shape, Snapshot};
