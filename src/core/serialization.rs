//! 9-character board codec shared by the wire protocol, serde and the
//! self-play reports.

use super::board::{Board, CELL_COUNT};
use super::types::Cell;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// Decodes a `-`/`1`/`2` render back into a board.
pub fn decode_board(s: &str) -> Result<Board, GameError> {
    let mut cells = [Cell::Empty; CELL_COUNT];
    let mut len = 0;

    for (i, c) in s.chars().enumerate() {
        if i >= CELL_COUNT {
            return Err(GameError::BadRender {
                render: s.to_string(),
                reason: format!("expected {CELL_COUNT} cells"),
            });
        }
        cells[i] = Cell::from_char(c).ok_or_else(|| GameError::BadRender {
            render: s.to_string(),
            reason: format!("unexpected character {c:?} at {i}"),
        })?;
        len += 1;
    }

    if len != CELL_COUNT {
        return Err(GameError::BadRender {
            render: s.to_string(),
            reason: format!("expected {CELL_COUNT} cells, got {len}"),
        });
    }

    Ok(Board::from_cells(cells))
}

impl Board {
    pub fn from_render(s: &str) -> Result<Board, GameError> {
        decode_board(s)
    }
}

/// serde 用の中間表現
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardRepr(String);

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        BoardRepr(board.render())
    }
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        decode_board(&repr.0)
    }
}
