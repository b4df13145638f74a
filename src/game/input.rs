use crate::game::Rotation;

/// One discrete player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateClockwise,
    RotateCounterClockwise,
}

impl Intent {
    pub fn rotation(self) -> Option<Rotation> {
        match self {
            Intent::RotateClockwise => Some(Rotation::Clockwise),
            Intent::RotateCounterClockwise => Some(Rotation::CounterClockwise),
            _ => None,
        }
    }
}
