use super::types::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIZE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 盤面 (3x3, 行優先で 0..=8)
///
/// A plain `Copy` value: the search derives children by copying, never by
/// mutating the session's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(
    into = "crate::core::serialization::BoardRepr",
    try_from = "crate::core::serialization::BoardRepr"
)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
    /// 着手数 (空でないマスの数)
    move_count: u8,
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; CELL_COUNT],
            move_count: 0,
        }
    }

    /// Builds a board from raw cells; the move counter is derived.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        let move_count = cells.iter().filter(|c| !c.is_empty()).count() as u8;
        Board { cells, move_count }
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn get_at(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        self.get(row * BOARD_SIZE + col)
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn move_count(&self) -> usize {
        self.move_count as usize
    }

    pub fn is_full(&self) -> bool {
        self.move_count() == CELL_COUNT
    }

    /// Copy of this board with `mark` written into an empty cell.
    ///
    /// # Panics
    /// If `index` is out of range, the cell is taken, or `mark` is `Cell::Empty`.
    pub(crate) fn with_mark(&self, index: usize, mark: Cell) -> Board {
        assert!(index < CELL_COUNT, "cell index {index} out of range");
        assert!(
            self.cells[index].is_empty(),
            "cell {index} is already taken by {:?}",
            self.cells[index]
        );
        assert!(!mark.is_empty(), "cannot place an empty mark");

        let mut next = *self;
        next.cells[index] = mark;
        next.move_count += 1;
        next
    }

    /// 9文字表現 ('-', '1', '2')
    pub fn render(&self) -> String {
        self.cells.iter().map(|c| c.to_char()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.to_char())?;
        }
        Ok(())
    }
}
