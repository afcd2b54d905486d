pub mod game;
pub mod mode;
pub mod protocol;
pub mod snapshot;
pub mod tetrix;
pub mod tetromino;

pub use game::{Game, COLS, QUEUE_LEN, ROWS};
pub use mode::GameMode;
pub use protocol::{Command, Direction, ProtocolError};
pub use snapshot::GameSnapshot;
pub use tetrix::{TetrixField, TetrixPiece, TETRIX_COLS, TETRIX_ROWS};
pub use tetromino::{flatten, piece_id, rotate_cw, PieceCells, PIECE_SIZE, TETROMINOES};
