pub mod render;

pub use render::{View, cell_color, draw_game};
