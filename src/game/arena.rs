use crate::game::Piece;

/// Settled blocks. Rows run top to bottom and every row holds exactly
/// `width` cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    width: usize,
    height: usize,
    rows: Vec<Vec<u8>>,
}

impl Arena {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![0; width]; height],
        }
    }

    /// Build an arena from explicit rows. Short rows are padded with empty
    /// cells and long rows truncated so the width invariant holds.
    pub fn from_rows(width: usize, rows: Vec<Vec<u8>>) -> Self {
        let rows: Vec<Vec<u8>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, 0);
                row
            })
            .collect();
        Self {
            width,
            height: rows.len(),
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.rows[y][x] = value;
    }

    pub fn occupied(&self) -> usize {
        self.rows.iter().flatten().filter(|v| **v != 0).count()
    }

    /// True when a filled cell of `piece` is left or right of the arena,
    /// below the bottom row, or on a settled block. Cells above row 0 are
    /// treated as open space.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y, _)| {
            if x < 0 || x as usize >= self.width {
                return true;
            }
            if y < 0 {
                return false;
            }
            let yu = y as usize;
            yu >= self.height || self.rows[yu][x as usize] != 0
        })
    }

    /// Write the piece's filled cells into the grid. Cells outside the grid
    /// are dropped; `Game` never gets here with any, since pieces spawn at
    /// row 0 and only move down.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y, value) in piece.cells() {
            if x >= 0 && y >= 0 {
                let (xu, yu) = (x as usize, y as usize);
                if xu < self.width && yu < self.height {
                    self.rows[yu][xu] = value;
                }
            }
        }
    }

    /// Remove every full row, bottom first, refilling from the top.
    /// Returns the number of rows cleared.
    pub fn sweep(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if self.rows[row].iter().all(|v| *v != 0) {
                let mut emptied = self.rows.remove(row);
                emptied.fill(0);
                self.rows.insert(0, emptied);
                cleared += 1;
                // the row above has shifted into `row`; look at it again
                continue;
            }
            y -= 1;
        }
        cleared
    }

    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(|row| row.fill(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Shape;

    fn piece_at(shape: Shape, x: i32, y: i32) -> Piece {
        let mut p = Piece::new(shape);
        p.x = x;
        p.y = y;
        p
    }

    #[test]
    fn empty_arena_has_no_collision_inside() {
        let arena = Arena::new(12, 20);
        assert!(!arena.collides(&piece_at(Shape::O, 5, 0)));
        assert!(!arena.collides(&piece_at(Shape::O, 0, 18)));
    }

    #[test]
    fn columns_out_of_range_collide() {
        let arena = Arena::new(6, 6);
        assert!(arena.collides(&piece_at(Shape::O, -1, 0)));
        assert!(arena.collides(&piece_at(Shape::O, 5, 0)));
    }

    #[test]
    fn empty_matrix_columns_may_hang_outside() {
        let arena = Arena::new(6, 6);
        // I is vertical in column 1 of its 4x4 matrix
        assert!(!arena.collides(&piece_at(Shape::I, -1, 0)));
        assert!(arena.collides(&piece_at(Shape::I, -2, 0)));
    }

    #[test]
    fn below_bottom_collides() {
        let arena = Arena::new(6, 6);
        assert!(!arena.collides(&piece_at(Shape::O, 0, 4)));
        assert!(arena.collides(&piece_at(Shape::O, 0, 5)));
    }

    #[test]
    fn rows_above_top_never_collide() {
        let arena = Arena::new(6, 6);
        assert!(!arena.collides(&piece_at(Shape::O, 2, -1)));
        assert!(!arena.collides(&piece_at(Shape::O, 2, -10)));
    }

    #[test]
    fn occupied_cell_collides() {
        let mut arena = Arena::new(6, 6);
        arena.set(3, 3, 4);
        assert!(arena.collides(&piece_at(Shape::O, 2, 2)));
        assert!(!arena.collides(&piece_at(Shape::O, 0, 2)));
    }

    #[test]
    fn merge_writes_colour_and_skips_offscreen_cells() {
        let mut arena = Arena::new(6, 6);
        arena.merge(&piece_at(Shape::O, 1, -1));
        assert_eq!(arena.occupied(), 2);
        assert_eq!(arena.get(1, 0), Shape::O.color());
        assert_eq!(arena.get(2, 0), Shape::O.color());
    }

    #[test]
    fn sweep_without_full_rows_is_identity() {
        let mut arena = Arena::from_rows(4, vec![vec![0; 4], vec![1, 0, 1, 1], vec![1, 1, 0, 1]]);
        let before = arena.clone();
        assert_eq!(arena.sweep(), 0);
        assert_eq!(arena, before);
    }

    #[test]
    fn sweep_clears_single_bottom_row() {
        let mut arena = Arena::new(4, 5);
        for x in 0..4 {
            arena.set(x, 4, 1);
        }
        assert_eq!(arena.sweep(), 1);
        assert_eq!(arena.occupied(), 0);
        assert_eq!(arena.rows()[4], vec![0; 4]);
        assert_eq!(arena.height(), 5);
    }

    #[test]
    fn sweep_clears_adjacent_and_split_rows_in_one_call() {
        let mut arena = Arena::from_rows(
            3,
            vec![
                vec![0, 0, 0],
                vec![2, 2, 2],
                vec![0, 3, 0],
                vec![1, 1, 1],
                vec![5, 5, 5],
            ],
        );
        assert_eq!(arena.sweep(), 3);
        assert_eq!(
            arena.rows(),
            &[
                vec![0, 0, 0],
                vec![0, 0, 0],
                vec![0, 0, 0],
                vec![0, 0, 0],
                vec![0, 3, 0],
            ]
        );
    }

    #[test]
    fn from_rows_pads_to_width() {
        let arena = Arena::from_rows(4, vec![vec![1], vec![1, 1, 1, 1, 1]]);
        assert!(arena.rows().iter().all(|r| r.len() == 4));
        assert_eq!(arena.occupied(), 5);
    }

    #[test]
    fn clear_empties_every_cell() {
        let mut arena = Arena::new(4, 4);
        arena.set(0, 0, 1);
        arena.set(3, 3, 7);
        arena.clear();
        assert_eq!(arena.occupied(), 0);
        assert_eq!(arena.height(), 4);
    }
}
