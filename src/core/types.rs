use serde::{Deserialize, Serialize};
use std::fmt;

/// マス目の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    PlayerMark,   // 人間側 ('1')
    ComputerMark, // コンピュータ側 ('2')
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Wire character used by the board render.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::PlayerMark => '1',
            Cell::ComputerMark => '2',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' => Some(Cell::Empty),
            '1' => Some(Cell::PlayerMark),
            '2' => Some(Cell::ComputerMark),
            _ => None,
        }
    }
}

/// 手番
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Turn {
    #[default]
    None,
    Player,
    Computer,
}

impl Turn {
    pub fn opponent(self) -> Turn {
        match self {
            Turn::Player => Turn::Computer,
            Turn::Computer => Turn::Player,
            Turn::None => Turn::None,
        }
    }

    /// The mark this side places. `Turn::None` has no mark.
    pub fn mark(self) -> Option<Cell> {
        match self {
            Turn::Player => Some(Cell::PlayerMark),
            Turn::Computer => Some(Cell::ComputerMark),
            Turn::None => None,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Turn::None => write!(f, "nobody"),
            Turn::Player => write!(f, "player"),
            Turn::Computer => write!(f, "computer"),
        }
    }
}

/// 盤面から決まる対局結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Ongoing,
    PlayerWin,
    ComputerWin,
    Draw,
}

impl GameOutcome {
    pub fn is_over(self) -> bool {
        self != GameOutcome::Ongoing
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameOutcome::Ongoing => write!(f, "ongoing"),
            GameOutcome::PlayerWin => write!(f, "player wins"),
            GameOutcome::ComputerWin => write!(f, "computer wins"),
            GameOutcome::Draw => write!(f, "draw"),
        }
    }
}
