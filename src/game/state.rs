use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::{OverflowPolicy, Settings};
use crate::game::{Arena, Intent, Matrix, Piece, Rotation, Shape, random_shape};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Notifications produced when a piece locks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Locked { cleared: usize },
    /// The new piece could not be placed and play has stopped.
    GameOver { score: u64 },
    /// The new piece could not be placed and the arena was wiped.
    ArenaReset,
}

/// Read-only view handed to renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub arena: Vec<Vec<u8>>,
    pub piece: Matrix,
    pub piece_x: i32,
    pub piece_y: i32,
    pub shape: Shape,
    pub phase: Phase,
    pub score: u64,
    pub lines: u64,
}

impl Snapshot {
    /// Arena with the active piece painted in, for renderers that want a
    /// single grid.
    pub fn composed(&self) -> Vec<Vec<u8>> {
        let mut grid = self.arena.clone();
        for (dy, row) in self.piece.iter().enumerate() {
            for (dx, &value) in row.iter().enumerate() {
                let x = self.piece_x + dx as i32;
                let y = self.piece_y + dy as i32;
                if value == 0 || x < 0 || y < 0 {
                    continue;
                }
                if let Some(cell) = grid
                    .get_mut(y as usize)
                    .and_then(|r| r.get_mut(x as usize))
                {
                    *cell = value;
                }
            }
        }
        grid
    }
}

pub struct Game {
    pub arena: Arena,
    pub current: Piece,
    pub phase: Phase,
    pub score: u64,
    pub lines_cleared: u64,
    overflow: OverflowPolicy,
    drop_interval: Duration,
    drop_counter: Duration,
    rng: StdRng,
}

impl Game {
    pub fn new(settings: &Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }

    /// Deterministic game on a default-sized arena.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(&Settings::default(), StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: &Settings, rng: StdRng) -> Self {
        let mut game = Self {
            arena: Arena::new(settings.width, settings.height),
            current: Piece::new(Shape::O),
            phase: Phase::Playing,
            score: 0,
            lines_cleared: 0,
            overflow: settings.overflow,
            drop_interval: settings.drop_interval,
            drop_counter: Duration::ZERO,
            rng,
        };
        game.spawn();
        game
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn drop_counter(&self) -> Duration {
        self.drop_counter
    }

    pub fn apply(&mut self, intent: Intent) -> Option<GameEvent> {
        match intent {
            Intent::MoveLeft => {
                self.move_horizontal(-1);
                None
            }
            Intent::MoveRight => {
                self.move_horizontal(1);
                None
            }
            Intent::SoftDrop => self.soft_drop(),
            Intent::HardDrop => self.hard_drop(),
            Intent::RotateClockwise | Intent::RotateCounterClockwise => {
                if let Some(dir) = intent.rotation() {
                    self.rotate(dir);
                }
                None
            }
        }
    }

    pub fn move_horizontal(&mut self, dir: i32) -> bool {
        if self.is_over() {
            return false;
        }
        self.current.x += dir;
        if self.arena.collides(&self.current) {
            self.current.x -= dir;
            return false;
        }
        true
    }

    /// One row down, locking the piece if it cannot move.
    pub fn soft_drop(&mut self) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        self.drop_counter = Duration::ZERO;
        self.current.y += 1;
        if !self.arena.collides(&self.current) {
            return None;
        }
        self.current.y -= 1;
        Some(self.lock_and_spawn())
    }

    pub fn hard_drop(&mut self) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        self.drop_counter = Duration::ZERO;
        while !self.arena.collides(&self.current.shifted(0, 1)) {
            self.current.y += 1;
        }
        Some(self.lock_and_spawn())
    }

    /// Rotate in place, nudging sideways (+1, -2, +3, ...) when the new
    /// orientation collides. Restores the piece if nothing fits.
    pub fn rotate(&mut self, dir: Rotation) -> bool {
        if self.is_over() {
            return false;
        }
        let origin_x = self.current.x;
        self.current.rotate(dir);
        let width = self.current.width() as i32;
        let mut offset: i32 = 1;
        while self.arena.collides(&self.current) {
            if offset.abs() > width {
                self.current.rotate(dir.inverse());
                self.current.x = origin_x;
                return false;
            }
            self.current.x += offset;
            offset = -(offset + offset.signum());
        }
        true
    }

    /// Advance the gravity clock, dropping one row once the accumulated
    /// time exceeds the drop interval.
    pub fn tick(&mut self, elapsed: Duration) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        self.drop_counter += elapsed;
        if self.drop_counter > self.drop_interval {
            return self.soft_drop();
        }
        None
    }

    pub fn restart(&mut self) {
        self.arena.clear();
        self.score = 0;
        self.lines_cleared = 0;
        self.drop_counter = Duration::ZERO;
        self.phase = Phase::Playing;
        self.spawn();
        log::info!("new game on {}x{} arena", self.arena.width(), self.arena.height());
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            arena: self.arena.rows().to_vec(),
            piece: self.current.matrix.clone(),
            piece_x: self.current.x,
            piece_y: self.current.y,
            shape: self.current.shape,
            phase: self.phase,
            score: self.score,
            lines: self.lines_cleared,
        }
    }

    /// Where the active piece would land on a hard drop.
    pub fn ghost_piece(&self) -> Piece {
        let mut ghost = self.current.clone();
        while !self.arena.collides(&ghost.shifted(0, 1)) {
            ghost.y += 1;
        }
        ghost
    }

    fn lock_and_spawn(&mut self) -> GameEvent {
        self.arena.merge(&self.current);
        let cleared = self.arena.sweep();
        if cleared > 0 {
            self.lines_cleared += cleared as u64;
            self.add_score(cleared);
        }
        log::debug!(
            "locked {:?} at ({}, {}), cleared {}",
            self.current.shape,
            self.current.x,
            self.current.y,
            cleared
        );
        self.spawn().unwrap_or(GameEvent::Locked { cleared })
    }

    /// Put a fresh random piece at the top centre. Returns an event when the
    /// stack has reached the top.
    fn spawn(&mut self) -> Option<GameEvent> {
        let piece = Piece::new(random_shape(&mut self.rng));
        self.place_spawned(piece)
    }

    fn place_spawned(&mut self, mut piece: Piece) -> Option<GameEvent> {
        piece.y = 0;
        piece.x = (self.arena.width() / 2) as i32 - (piece.width() / 2) as i32;
        self.current = piece;
        if !self.arena.collides(&self.current) {
            return None;
        }
        match self.overflow {
            OverflowPolicy::Halt => {
                self.phase = Phase::GameOver;
                log::info!("game over with score {}", self.score);
                Some(GameEvent::GameOver { score: self.score })
            }
            OverflowPolicy::Clear => {
                self.arena.clear();
                log::info!("stack overflowed, arena cleared");
                Some(GameEvent::ArenaReset)
            }
        }
    }

    fn add_score(&mut self, cleared: usize) {
        let add = match cleared {
            0 => 0,
            1 => 100,
            2 => 300,
            3 => 500,
            _ => 800,
        };
        self.score += add;
    }
}
