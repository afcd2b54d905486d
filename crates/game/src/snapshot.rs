//! Wire-side projection of a game.
//!
//! A snapshot is an element-wise deep copy: it never aliases the live
//! board, piece or queue storage, so the session can hand it to the
//! transport while the game keeps mutating.

use serde::Serialize;

use crate::game::{Game, COLS, ROWS};
use crate::mode::GameMode;
use crate::tetromino::PieceCells;

/// Full game state as sent to the client after every accepted mutation
/// and every gravity tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: [[u8; COLS]; ROWS],
    pub piece: PieceCells,
    pub next: Vec<PieceCells>,
    pub piece_id: u8,
    pub x: i32,
    pub y: i32,
    pub score: u64,
    pub game_over: bool,
    pub paused: bool,
    #[serde(rename = "Highscore")]
    pub high_score: u64,
    pub mode: GameMode,
}

impl Game {
    /// Copies the current state into a transmission-safe snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            piece: self.piece,
            next: self.next.iter().copied().collect(),
            piece_id: self.piece_id,
            x: self.x,
            y: self.y,
            score: self.score,
            game_over: self.game_over,
            paused: self.paused,
            high_score: self.high_score,
            mode: self.mode.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_game() -> Game {
        Game::new(GameMode::beginner(), StdRng::seed_from_u64(3))
    }

    #[test]
    fn snapshot_does_not_alias_game_state() {
        let mut game = test_game();
        let snapshot = game.snapshot();

        game.board[10][4] = 7;
        game.step();
        game.hard_drop();

        assert_eq!(snapshot.board[10][4], 0);
        assert_eq!(snapshot.y, 0);
        assert_eq!(snapshot.score, 0);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut game = test_game();
        game.step();
        game.move_down();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.y, game.y);
        assert_eq!(snapshot.piece, game.piece);
        assert_eq!(snapshot.next.len(), game.next.len());
        assert_eq!(snapshot.mode, game.mode);
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let game = test_game();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        for key in [
            "board",
            "piece",
            "next",
            "pieceId",
            "x",
            "y",
            "score",
            "gameOver",
            "paused",
            "Highscore",
            "mode",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["board"].as_array().unwrap().len(), ROWS);
        assert_eq!(json["board"][0].as_array().unwrap().len(), COLS);
        assert_eq!(json["piece"].as_array().unwrap().len(), 16);
        assert_eq!(json["next"].as_array().unwrap().len(), 3);
        assert_eq!(json["gameOver"], false);
    }
}
