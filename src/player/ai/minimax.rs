use crate::core::{Board, Turn, CELL_COUNT};
use crate::error::GameError;
use crate::logic::{legal_moves, outcome, place, score};
use crate::player::PlayerController;
use arrayvec::ArrayVec;
use tracing::debug;

/// 探索深さ (残り最大8手 = 全読み)
pub const SEARCH_DEPTH: u32 = 8;

/// Score of every legal move for `to_move`, in ascending cell order.
pub fn evaluate_moves(
    board: &Board,
    to_move: Turn,
) -> Result<ArrayVec<(usize, i32), CELL_COUNT>, GameError> {
    if to_move == Turn::None {
        return Err(GameError::NoMover);
    }
    let moves = legal_moves(board);
    if moves.is_empty() || outcome(board).is_over() {
        return Err(GameError::SearchOnTerminal {
            board: board.render(),
        });
    }

    Ok(moves
        .into_iter()
        .map(|mv| {
            let next_board = place(board, to_move, mv);
            // 自分の一手は置いたので、次は相手の手番
            (mv, best_guess(&next_board, SEARCH_DEPTH, to_move.opponent()))
        })
        .collect())
}

/// The move `to_move` should play now.
///
/// The computer keeps the highest score and the player the lowest. Only a
/// strictly better score displaces the current pick, so ties go to the
/// lowest index.
pub fn best_move(board: &Board, to_move: Turn) -> Result<usize, GameError> {
    let scored = evaluate_moves(board, to_move)?;

    let mut best = scored[0];
    for &(mv, value) in scored.iter().skip(1) {
        let better = match to_move {
            Turn::Computer => value > best.1,
            _ => value < best.1,
        };
        if better {
            best = (mv, value);
        }
    }

    debug!(
        board = %board,
        side = %to_move,
        mv = best.0,
        score = best.1,
        "search finished"
    );
    Ok(best.0)
}

/// Minimax value of `board` with `mover` to place the next mark.
///
/// No pruning: with nine cells the full tree is small enough.
///
/// # Panics
/// If `mover` is `Turn::None` and the board is still open.
pub fn best_guess(board: &Board, depth_remaining: u32, mover: Turn) -> i32 {
    let result = outcome(board);
    if depth_remaining == 0 || result.is_over() {
        return score(result);
    }

    let children = legal_moves(board).into_iter().map(|mv| {
        let next_board = place(board, mover, mv);
        best_guess(&next_board, depth_remaining - 1, mover.opponent())
    });

    let combined = match mover {
        Turn::Computer => children.max(),
        _ => children.min(),
    };
    // 終局でなければ空きマスは必ずある
    combined.unwrap_or_else(|| score(result))
}

pub struct MinimaxAI {
    pub side: Turn,
    pub name: String,
}

impl MinimaxAI {
    pub fn new(side: Turn, name: &str) -> Self {
        Self {
            side,
            name: name.to_string(),
        }
    }
}

impl PlayerController for MinimaxAI {
    fn choose_move(&self, board: &Board, moves: &[usize]) -> Option<usize> {
        if moves.is_empty() {
            return None;
        }
        best_move(board, self.side).ok()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn side(&self) -> Turn {
        self.side
    }
}
