pub mod board;
pub mod serialization;
pub mod types;

pub use board::{Board, BOARD_SIZE, CELL_COUNT};
pub use serialization::decode_board;
pub use types::{Cell, GameOutcome, Turn};
