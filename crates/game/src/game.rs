//! The game state and the rules that mutate it.
//!
//! A `Game` is owned by exactly one session. Every operation here assumes
//! the caller already serializes access (the session wraps the game in a
//! mutex); nothing in this module performs I/O or blocks.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use crate::mode::GameMode;
use crate::tetromino::{flatten, piece_id, rotate_cw, PieceCells, TETROMINOES};

/// Board height in cells.
pub const ROWS: usize = 20;
/// Board width in cells.
pub const COLS: usize = 10;
/// Number of upcoming pieces kept in the lookahead queue.
pub const QUEUE_LEN: usize = 3;

/// Horizontal offsets tried when a rotation collides, in order. The wider
/// offsets exist for the I piece against a wall.
const KICK_OFFSETS: [i32; 5] = [0, 1, -1, 2, -2];

/// One live game: board, active piece, lookahead queue, score and flags.
///
/// Cell values are 0 for empty or the shape id (1..=7) of the occupant.
/// The active piece is a flattened 4x4 window anchored at `(x, y)`, the
/// board coordinate of the window's top-left corner.
#[derive(Debug)]
pub struct Game {
    pub board: [[u8; COLS]; ROWS],
    pub piece: PieceCells,
    pub piece_id: u8,
    pub next: VecDeque<PieceCells>,
    pub x: i32,
    pub y: i32,
    pub score: u64,
    pub game_over: bool,
    pub paused: bool,
    pub high_score: u64,
    pub mode: GameMode,
    rng: StdRng,
}

impl Game {
    /// Creates a fresh game in the given mode, fills the lookahead queue
    /// and spawns the first piece.
    pub fn new(mode: GameMode, mut rng: StdRng) -> Self {
        let mut next = VecDeque::with_capacity(QUEUE_LEN);
        for _ in 0..QUEUE_LEN {
            next.push_back(random_piece(&mut rng));
        }

        let mut game = Self {
            board: [[0; COLS]; ROWS],
            piece: [0; 16],
            piece_id: 0,
            next,
            x: 0,
            y: 0,
            score: 0,
            game_over: false,
            paused: false,
            high_score: 0,
            mode,
            rng,
        };
        game.spawn();
        log::debug!(
            "new game: mode={} x={} y={}",
            game.mode.name,
            game.x,
            game.y
        );
        game
    }

    /// True if any occupied cell of `cells` anchored at `(px, py)` falls
    /// outside the board or lands on an occupied board cell.
    pub fn collides(&self, px: i32, py: i32, cells: &PieceCells) -> bool {
        for y in 0..4 {
            for x in 0..4 {
                if cells[y * 4 + x] == 0 {
                    continue;
                }
                // saturating: any anchor is a legal query, extreme ones
                // are simply out of bounds
                let bx = px.saturating_add(x as i32);
                let by = py.saturating_add(y as i32);
                if bx < 0 || bx >= COLS as i32 || by < 0 || by >= ROWS as i32 {
                    return true;
                }
                if self.board[by as usize][bx as usize] != 0 {
                    return true;
                }
            }
        }
        false
    }

    /// Pops the queue head as the new active piece, refills the tail and
    /// resets the anchor to the spawn position.
    fn spawn(&mut self) {
        match self.next.pop_front() {
            Some(cells) => {
                self.piece = cells;
                self.piece_id = piece_id(&cells);
                let fresh = random_piece(&mut self.rng);
                self.next.push_back(fresh);
            }
            None => {
                // bootstrap path: the queue is only empty before the
                // constructor has filled it
                let id = self.rng.gen_range(0..TETROMINOES.len());
                self.piece = flatten(&TETROMINOES[id]);
                self.piece_id = (id + 1) as u8;
            }
        }
        self.x = (COLS as i32 / 2) - 2;
        self.y = 0;
    }

    /// Commits the active piece into the board, clears lines, spawns the
    /// next piece and checks for game over.
    ///
    /// Cells locking above the visible field are dropped silently; that
    /// only happens when a piece comes to rest partially above row 0.
    fn lock(&mut self) {
        for y in 0..4 {
            for x in 0..4 {
                let v = self.piece[y * 4 + x];
                if v == 0 {
                    continue;
                }
                let bx = self.x + x as i32;
                let by = self.y + y as i32;
                if (0..ROWS as i32).contains(&by) && (0..COLS as i32).contains(&bx) {
                    self.board[by as usize][bx as usize] = v;
                }
            }
        }
        self.clear_lines();
        self.spawn();
        if self.collides(self.x, self.y, &self.piece) {
            self.game_over = true;
            log::debug!("game over at score {}", self.score);
        }
    }

    /// Removes full rows, compacts the rest downwards and prepends zeroed
    /// rows so the row count never changes. Scoring is quadratic in the
    /// number of simultaneously cleared lines:
    /// `cleared * 100 * cleared`, scaled by the mode multiplier and
    /// truncated to an integer.
    fn clear_lines(&mut self) {
        let mut kept: Vec<[u8; COLS]> = Vec::with_capacity(ROWS);
        let mut cleared = 0usize;
        for row in &self.board {
            if row.iter().all(|&c| c != 0) {
                cleared += 1;
            } else {
                kept.push(*row);
            }
        }
        if cleared == 0 {
            return;
        }

        let mut board = [[0u8; COLS]; ROWS];
        for (i, row) in kept.into_iter().enumerate() {
            board[cleared + i] = row;
        }
        self.board = board;

        let base = (cleared * 100 * cleared) as f64;
        self.score += (base * self.mode.score_multiplier) as u64;
        log::debug!("cleared {} lines, score {}", cleared, self.score);
    }

    /// Gravity tick: descend one row or lock. No-op when over or paused.
    pub fn step(&mut self) {
        if self.game_over || self.paused {
            return;
        }
        if !self.collides(self.x, self.y + 1, &self.piece) {
            self.y += 1;
        } else {
            self.lock();
        }
    }

    /// Moves the active piece one column left. Returns whether state changed.
    pub fn move_left(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if !self.collides(self.x - 1, self.y, &self.piece) {
            self.x -= 1;
            return true;
        }
        false
    }

    /// Moves the active piece one column right. Returns whether state changed.
    pub fn move_right(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if !self.collides(self.x + 1, self.y, &self.piece) {
            self.x += 1;
            return true;
        }
        false
    }

    /// Moves the active piece one row down. Returns whether state changed.
    pub fn move_down(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if !self.collides(self.x, self.y + 1, &self.piece) {
            self.y += 1;
            return true;
        }
        false
    }

    /// Rotates the active piece clockwise, trying the wall-kick offsets in
    /// order. The first placement that fits wins; otherwise the rotation is
    /// rejected and nothing changes.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let rotated = rotate_cw(&self.piece);
        for dx in KICK_OFFSETS {
            if !self.collides(self.x + dx, self.y, &rotated) {
                self.x += dx;
                self.piece = rotated;
                return true;
            }
        }
        false
    }

    /// Drops the active piece to the lowest non-colliding row and locks it.
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        while !self.collides(self.x, self.y + 1, &self.piece) {
            self.y += 1;
        }
        self.lock();
        true
    }

    /// Toggles pause, rejected when the mode forbids pausing or the game
    /// is already over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over || !self.mode.can_pause {
            return false;
        }
        self.paused = !self.paused;
        true
    }
}

fn random_piece(rng: &mut StdRng) -> PieceCells {
    let id = rng.gen_range(0..TETROMINOES.len());
    flatten(&TETROMINOES[id])
}
