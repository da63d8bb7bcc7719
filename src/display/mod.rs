use crate::core::{Board, Cell, GameOutcome, BOARD_SIZE};
use crossterm::style::Stylize;
use std::io::Write;

pub struct DisplayState {
    pub status_msg: Option<String>,
    /// 直前のコンピュータの手
    pub last_move: Option<usize>,
    pub show_indices: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status_msg: None,
            last_move: None,
            show_indices: true, // empty cells show the number to type
        }
    }
}

fn cell_text(board: &Board, index: usize, state: &DisplayState) -> String {
    match board.get(index) {
        Some(Cell::PlayerMark) => "X".to_string(),
        Some(Cell::ComputerMark) => "O".to_string(),
        _ if state.show_indices => index.to_string(),
        _ => " ".to_string(),
    }
}

pub fn render_board(board: &Board, state: &DisplayState) -> std::io::Result<()> {
    let mut out = std::io::stdout();

    writeln!(out)?;
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let index = row * BOARD_SIZE + col;
            let text = format!(" {} ", cell_text(board, index, state));
            let styled = match board.get(index) {
                Some(Cell::PlayerMark) => text.cyan(),
                Some(Cell::ComputerMark) if state.last_move == Some(index) => text.red().bold(),
                Some(Cell::ComputerMark) => text.magenta(),
                _ => text.dark_grey(),
            };
            write!(out, "{}", styled)?;
            if col < BOARD_SIZE - 1 {
                write!(out, "|")?;
            }
        }
        writeln!(out)?;
        if row < BOARD_SIZE - 1 {
            writeln!(out, "---+---+---")?;
        }
    }

    if let Some(msg) = &state.status_msg {
        writeln!(out, "{}", msg.clone().bold().yellow())?;
    }
    out.flush()
}

pub fn outcome_message(result: GameOutcome) -> &'static str {
    match result {
        GameOutcome::PlayerWin => "You won!",
        GameOutcome::ComputerWin => "The computer won.",
        GameOutcome::Draw => "It's a tie.",
        GameOutcome::Ongoing => "The game is still going.",
    }
}

/// The cell the computer just filled, given the previous and current board.
pub fn new_computer_mark(before: &Board, after: &Board) -> Option<usize> {
    (0..before.cells().len()).find(|&i| {
        before.get(i) == Some(Cell::Empty) && after.get(i) == Some(Cell::ComputerMark)
    })
}
