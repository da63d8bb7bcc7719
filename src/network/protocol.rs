//! Line protocol spoken between the server and a client.
//!
//! Server → client: a 9-char board render when a move is wanted, or one of
//! `#P`, `#C`, `#T` when the game ends. Client → server: a cell index `0`-`8`,
//! or `#NG` / `#CG` after a game.

use crate::core::{Board, GameOutcome};
use crate::game::{Reply, RestartDecision};

pub const PLAYER_WON: &str = "#P";
pub const COMPUTER_WON: &str = "#C";
pub const TIE: &str = "#T";
pub const NEW_GAME: &str = "#NG";
pub const CLOSE_GAME: &str = "#CG";

/// Encodes a reply as a newline-terminated line.
pub fn encode(reply: &Reply) -> String {
    let body = match reply {
        Reply::Prompt(board) => board.render(),
        Reply::Finished(result) => outcome_code(*result).to_string(),
    };
    body + "\n"
}

fn outcome_code(result: GameOutcome) -> &'static str {
    match result {
        GameOutcome::PlayerWin => PLAYER_WON,
        GameOutcome::ComputerWin => COMPUTER_WON,
        // Ongoing never reaches the wire
        GameOutcome::Draw | GameOutcome::Ongoing => TIE,
    }
}

/// Decimal cell index. Anything else, including negatives, is `None`.
pub fn parse_move(line: &str) -> Option<usize> {
    let token = line.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

pub fn parse_decision(line: &str) -> Option<RestartDecision> {
    match line.trim() {
        NEW_GAME => Some(RestartDecision::NewGame),
        CLOSE_GAME => Some(RestartDecision::Close),
        _ => None,
    }
}

pub fn encode_decision(decision: RestartDecision) -> String {
    match decision {
        RestartDecision::NewGame => format!("{NEW_GAME}\n"),
        RestartDecision::Close => format!("{CLOSE_GAME}\n"),
    }
}

/// クライアント側で受信した行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Board(Board),
    Outcome(GameOutcome),
    Unknown(String),
}

impl ServerMessage {
    pub fn parse(line: &str) -> ServerMessage {
        let token = line.trim();
        match token {
            PLAYER_WON => ServerMessage::Outcome(GameOutcome::PlayerWin),
            COMPUTER_WON => ServerMessage::Outcome(GameOutcome::ComputerWin),
            TIE => ServerMessage::Outcome(GameOutcome::Draw),
            _ => match Board::from_render(token) {
                Ok(board) => ServerMessage::Board(board),
                Err(_) => ServerMessage::Unknown(token.to_string()),
            },
        }
    }
}
