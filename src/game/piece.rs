use rand::Rng;
use serde::Serialize;

/// Row-major grid of colour indices. `0` is empty.
pub type Matrix = Vec<Vec<u8>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Shape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::T,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::Z,
        Shape::I,
    ];

    /// Colour index written into every filled cell of this shape.
    pub fn color(self) -> u8 {
        match self {
            Shape::T => 1,
            Shape::O => 2,
            Shape::L => 3,
            Shape::J => 4,
            Shape::I => 5,
            Shape::S => 6,
            Shape::Z => 7,
        }
    }

    /// Canonical spawn orientation.
    pub fn matrix(self) -> Matrix {
        let layout: &[&[u8]] = match self {
            Shape::T => &[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]],
            Shape::O => &[&[1, 1], &[1, 1]],
            Shape::L => &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]],
            Shape::J => &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
            Shape::I => &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
            Shape::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Shape::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        let color = self.color();
        layout
            .iter()
            .map(|row| row.iter().map(|&v| v * color).collect())
            .collect()
    }
}

pub fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> Shape {
    Shape::ALL[rng.gen_range(0..Shape::ALL.len())]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }
}

/// Rotate a matrix by 90 degrees. Rectangular input is fine; an `h x w`
/// matrix comes back as `w x h`.
pub fn rotate_matrix(matrix: &Matrix, dir: Rotation) -> Matrix {
    let h = matrix.len();
    let w = matrix.first().map_or(0, Vec::len);
    let mut transposed = vec![vec![0u8; h]; w];
    for (y, row) in matrix.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            transposed[x][y] = value;
        }
    }
    match dir {
        Rotation::Clockwise => transposed.iter_mut().for_each(|row| row.reverse()),
        Rotation::CounterClockwise => transposed.reverse(),
    }
    transposed
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub matrix: Matrix,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            matrix: shape.matrix(),
            x: 0,
            y: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.matrix.first().map_or(0, Vec::len)
    }

    /// Absolute arena coordinates of every filled cell with its colour.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.matrix.iter().enumerate().flat_map(move |(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(dx, &v)| (self.x + dx as i32, self.y + dy as i32, v))
        })
    }

    pub fn filled_count(&self) -> usize {
        self.matrix.iter().flatten().filter(|v| **v != 0).count()
    }

    pub fn rotate(&mut self, dir: Rotation) {
        self.matrix = rotate_matrix(&self.matrix, dir);
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        let mut next = self.clone();
        next.x += dx;
        next.y += dy;
        next
    }
}
