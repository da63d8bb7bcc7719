use crate::core::{Board, Cell, GameOutcome, Turn, CELL_COUNT};
use crate::error::GameError;
use arrayvec::ArrayVec;

/// 合法手リスト (最大9手, 昇順)
pub type MoveList = ArrayVec<usize, CELL_COUNT>;

/// 勝利ライン: 列3本, 行3本, 対角2本 (この順で判定)
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub const SCORE_PLAYER_WIN: i32 = 0;
pub const SCORE_NEUTRAL: i32 = 50;
pub const SCORE_COMPUTER_WIN: i32 = 100;

/// 合法手生成: 空きマスを昇順で返す
pub fn legal_moves(board: &Board) -> MoveList {
    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_empty())
        .map(|(i, _)| i)
        .collect()
}

/// Out-of-range and occupied cells are simply illegal; callers re-prompt.
pub fn is_legal(board: &Board, index: usize) -> bool {
    matches!(board.get(index), Some(Cell::Empty))
}

/// Returns a copy of `board` with `turn`'s mark at `index`.
///
/// # Panics
/// If the move is illegal or `turn` is `Turn::None`. Check [`is_legal`] first,
/// or use [`try_place`].
pub fn place(board: &Board, turn: Turn, index: usize) -> Board {
    let mark = match turn.mark() {
        Some(mark) => mark,
        None => panic!("place called without a mover"),
    };
    board.with_mark(index, mark)
}

pub fn try_place(board: &Board, turn: Turn, index: usize) -> Result<Board, GameError> {
    let mark = turn.mark().ok_or(GameError::NoMover)?;
    if !is_legal(board, index) {
        return Err(GameError::IllegalPlacement { index });
    }
    Ok(board.with_mark(index, mark))
}

/// 終局判定
pub fn outcome(board: &Board) -> GameOutcome {
    let cells = board.cells();

    for [a, b, c] in WIN_LINES {
        let first = cells[a];
        if first.is_empty() || cells[b] != first || cells[c] != first {
            continue;
        }
        return match first {
            Cell::PlayerMark => GameOutcome::PlayerWin,
            Cell::ComputerMark => GameOutcome::ComputerWin,
            Cell::Empty => unreachable!(),
        };
    }

    if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::Ongoing
    }
}

pub fn is_over(board: &Board) -> bool {
    outcome(board).is_over()
}

/// Leaf value for the search: higher is better for the computer.
pub fn score(outcome: GameOutcome) -> i32 {
    match outcome {
        GameOutcome::Ongoing | GameOutcome::Draw => SCORE_NEUTRAL,
        GameOutcome::PlayerWin => SCORE_PLAYER_WIN,
        GameOutcome::ComputerWin => SCORE_COMPUTER_WIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        Board::from_render(s).unwrap()
    }

    #[test]
    fn test_legal_moves_ascending() {
        let b = board("1-2-1-2--");
        assert_eq!(legal_moves(&b).as_slice(), &[1, 3, 5, 7, 8]);
        assert_eq!(legal_moves(&Board::new()).len(), 9);
        assert!(legal_moves(&board("121212212")).is_empty());
    }

    #[test]
    fn test_is_legal() {
        let b = board("1--------");
        assert!(!is_legal(&b, 0));
        assert!(is_legal(&b, 1));
        assert!(is_legal(&b, 8));
        assert!(!is_legal(&b, 9));
        assert!(!is_legal(&b, usize::MAX));
    }

    #[test]
    fn test_place_keeps_counter_in_sync() {
        let mut b = Board::new();
        let mut turn = Turn::Player;
        for index in [4, 0, 8, 2, 6] {
            b = place(&b, turn, index);
            turn = turn.opponent();
            let filled = b.cells().iter().filter(|c| !c.is_empty()).count();
            assert_eq!(b.move_count(), filled);
        }
        assert_eq!(b.render(), "2-2-1-1-1");
    }

    #[test]
    #[should_panic]
    fn test_place_illegal_panics() {
        let b = board("1--------");
        let _ = place(&b, Turn::Computer, 0);
    }

    #[test]
    fn test_try_place_errors() {
        let b = board("1--------");
        assert!(matches!(
            try_place(&b, Turn::Computer, 0),
            Err(GameError::IllegalPlacement { index: 0 })
        ));
        assert!(matches!(
            try_place(&b, Turn::None, 1),
            Err(GameError::NoMover)
        ));
        assert_eq!(
            try_place(&b, Turn::Computer, 1).unwrap().render(),
            "12-------"
        );
    }

    #[test]
    fn test_outcome_every_line() {
        for line in WIN_LINES {
            let mut cells = [Cell::Empty; CELL_COUNT];
            for i in line {
                cells[i] = Cell::PlayerMark;
            }
            assert_eq!(outcome(&Board::from_cells(cells)), GameOutcome::PlayerWin);

            for i in line {
                cells[i] = Cell::ComputerMark;
            }
            assert_eq!(
                outcome(&Board::from_cells(cells)),
                GameOutcome::ComputerWin
            );
        }
    }

    #[test]
    fn test_outcome_no_false_winner() {
        // 3 marks but not in a line
        assert_eq!(outcome(&board("11-1-----")), GameOutcome::Ongoing);
        assert_eq!(outcome(&board("12-------")), GameOutcome::Ongoing);
        // mixed line
        assert_eq!(outcome(&board("112------")), GameOutcome::Ongoing);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let b = board("121112212");
        assert_eq!(outcome(&b), GameOutcome::Draw);
        assert_eq!(score(outcome(&b)), 50);
    }

    #[test]
    fn test_win_on_last_move_beats_draw() {
        // full board with a player column
        let b = board("121122112");
        assert_eq!(b.move_count(), 9);
        assert_eq!(outcome(&b), GameOutcome::PlayerWin);
    }

    #[test]
    fn test_scores() {
        assert_eq!(score(GameOutcome::Ongoing), 50);
        assert_eq!(score(GameOutcome::Draw), 50);
        assert_eq!(score(GameOutcome::PlayerWin), 0);
        assert_eq!(score(GameOutcome::ComputerWin), 100);
    }
}
