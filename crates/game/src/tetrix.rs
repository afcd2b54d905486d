//! Decorative background field of falling shapes.
//!
//! Purely visual: pieces spawn at random columns, fall at their own speed
//! and disappear past the bottom edge. Nothing here touches gameplay.

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::tetromino::{flatten, PieceCells, TETROMINOES};

/// Virtual field width in cells.
pub const TETRIX_COLS: i32 = 40;
/// Virtual field height in cells.
pub const TETRIX_ROWS: i32 = 30;

/// Per-tick probability of spawning a new piece.
const SPAWN_CHANCE: f64 = 0.05;

/// One falling background piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrixPiece {
    pub shape: PieceCells,
    pub x: i32,
    pub y: i32,
    pub speed: i32,
}

/// The whole background field.
#[derive(Debug)]
pub struct TetrixField {
    pieces: Vec<TetrixPiece>,
    rng: StdRng,
}

impl TetrixField {
    pub fn new(rng: StdRng) -> Self {
        Self {
            pieces: Vec::new(),
            rng,
        }
    }

    /// Advances the animation one tick: maybe spawn, move everything by
    /// its own speed, drop pieces that scrolled out of view.
    pub fn step(&mut self) {
        if self.rng.gen_bool(SPAWN_CHANCE) {
            self.spawn();
        }
        for piece in &mut self.pieces {
            piece.y += piece.speed;
        }
        self.pieces.retain(|piece| piece.y < TETRIX_ROWS);
    }

    fn spawn(&mut self) {
        let id = self.rng.gen_range(0..TETROMINOES.len());
        self.pieces.push(TetrixPiece {
            shape: flatten(&TETROMINOES[id]),
            x: self.rng.gen_range(0..TETRIX_COLS - 4),
            y: -4,
            speed: self.rng.gen_range(1..=3),
        });
    }

    /// Deep copy of the current pieces, safe to serialize.
    pub fn snapshot(&self) -> Vec<TetrixPiece> {
        self.pieces.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn pieces_stay_inside_the_virtual_field() {
        let mut field = TetrixField::new(StdRng::seed_from_u64(42));
        for _ in 0..2000 {
            field.step();
            for piece in field.snapshot() {
                assert!(piece.y < TETRIX_ROWS);
                assert!((0..TETRIX_COLS - 4).contains(&piece.x));
                assert!((1..=3).contains(&piece.speed));
            }
        }
    }

    #[test]
    fn field_eventually_spawns_and_discards() {
        let mut field = TetrixField::new(StdRng::seed_from_u64(42));
        let mut seen_any = false;
        for _ in 0..500 {
            field.step();
            seen_any |= !field.snapshot().is_empty();
        }
        assert!(seen_any);
        // with discards at the bottom the population stays bounded far
        // below the spawn count
        assert!(field.snapshot().len() < 100);
    }

    #[test]
    fn snapshot_is_a_deep_copy() {
        let mut field = TetrixField::new(StdRng::seed_from_u64(1));
        while field.snapshot().is_empty() {
            field.step();
        }
        let snapshot = field.snapshot();
        let before = snapshot.clone();
        field.step();
        field.step();
        assert_eq!(snapshot, before);
    }
}
