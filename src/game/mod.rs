pub mod arena;
pub mod input;
pub mod piece;
pub mod state;

pub use arena::Arena;
pub use input::Intent;
pub use piece::{Matrix, Piece, Rotation, Shape, random_shape, rotate_matrix};
pub use state::{Game, GameEvent, Phase, Snapshot};
