//! Turn sequencing for one remote player against the search engine.
//!
//! `Session` performs no I/O. The transport feeds it move tokens and restart
//! decisions and writes out the `Reply` values it hands back.

use crate::core::{Board, GameOutcome, Turn};
use crate::error::GameError;
use crate::logic::{is_legal, outcome, place};
use crate::player::ai::best_move;
use rand::Rng;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    ChoosingFirstPlayer,
    ComputerTurn,
    PlayerTurn,
    GameOver,
    AwaitingRestartDecision,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    NewGame,
    Close,
}

/// Something the transport must send to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// 人間の手番: 盤面を送って着手を待つ
    Prompt(Board),
    Finished(GameOutcome),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub games_played: usize,
    pub player_wins: usize,
    pub computer_wins: usize,
    pub draws: usize,
}

impl SessionStats {
    pub fn add_result(&mut self, result: GameOutcome) {
        match result {
            GameOutcome::PlayerWin => self.player_wins += 1,
            GameOutcome::ComputerWin => self.computer_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => return,
        }
        self.games_played += 1;
    }
}

pub struct Session<R: Rng> {
    board: Board,
    state: SessionState,
    first_turn: Turn,
    whose_turn: Turn,
    /// 現在の対局の着手履歴
    history: Vec<(Turn, usize)>,
    stats: SessionStats,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(rng: R) -> Self {
        Session {
            board: Board::new(),
            state: SessionState::ChoosingFirstPlayer,
            first_turn: Turn::None,
            whose_turn: Turn::None,
            history: Vec::new(),
            stats: SessionStats::default(),
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn first_turn(&self) -> Turn {
        self.first_turn
    }

    pub fn whose_turn(&self) -> Turn {
        self.whose_turn
    }

    pub fn history(&self) -> &[(Turn, usize)] {
        &self.history
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Flips the coin for the first mover and plays until input is needed.
    pub fn start(&mut self) -> Result<Vec<Reply>, GameError> {
        if self.state != SessionState::ChoosingFirstPlayer {
            return Ok(Vec::new());
        }

        self.first_turn = if self.rng.gen_bool(0.5) {
            Turn::Player
        } else {
            Turn::Computer
        };
        info!(first = %self.first_turn, "new game");

        self.state = match self.first_turn {
            Turn::Computer => SessionState::ComputerTurn,
            _ => SessionState::PlayerTurn,
        };
        self.advance()
    }

    /// A move token from the player. `None` means it did not parse as a cell.
    ///
    /// Illegal input re-sends the current board; input outside the player's
    /// turn is dropped.
    pub fn submit_move(&mut self, cell: Option<usize>) -> Result<Vec<Reply>, GameError> {
        if self.state != SessionState::PlayerTurn {
            debug!(state = ?self.state, "move outside player turn ignored");
            return Ok(Vec::new());
        }

        let index = match cell.filter(|&i| is_legal(&self.board, i)) {
            Some(index) => index,
            None => {
                debug!(?cell, "illegal move, prompting again");
                return Ok(vec![Reply::Prompt(self.board)]);
            }
        };

        self.apply(Turn::Player, index);
        self.state = if outcome(&self.board).is_over() {
            SessionState::GameOver
        } else {
            SessionState::ComputerTurn
        };
        self.advance()
    }

    /// `None` is any token other than the two decisions; it is ignored.
    pub fn submit_restart_decision(
        &mut self,
        decision: Option<RestartDecision>,
    ) -> Result<Vec<Reply>, GameError> {
        if self.state != SessionState::AwaitingRestartDecision {
            return Ok(Vec::new());
        }

        match decision {
            None => Ok(Vec::new()),
            Some(RestartDecision::NewGame) => {
                info!("player asked for another game");
                self.board = Board::new();
                self.history.clear();
                self.first_turn = Turn::None;
                self.whose_turn = Turn::None;
                self.state = SessionState::ChoosingFirstPlayer;
                self.start()
            }
            Some(RestartDecision::Close) => {
                info!(stats = ?self.stats, "player closed the session");
                self.state = SessionState::Closed;
                Ok(Vec::new())
            }
        }
    }

    /// Runs computer turns and end-of-game until the session needs input.
    fn advance(&mut self) -> Result<Vec<Reply>, GameError> {
        let mut replies = Vec::new();

        loop {
            match self.state {
                SessionState::ComputerTurn => {
                    let mv = best_move(&self.board, Turn::Computer)?;
                    self.apply(Turn::Computer, mv);
                    self.state = if outcome(&self.board).is_over() {
                        SessionState::GameOver
                    } else {
                        SessionState::PlayerTurn
                    };
                }
                SessionState::PlayerTurn => {
                    self.whose_turn = Turn::Player;
                    replies.push(Reply::Prompt(self.board));
                    break;
                }
                SessionState::GameOver => {
                    let result = outcome(&self.board);
                    self.stats.add_result(result);
                    self.whose_turn = Turn::None;
                    info!(%result, board = %self.board, moves = self.history.len(), "game over");
                    replies.push(Reply::Finished(result));
                    self.state = SessionState::AwaitingRestartDecision;
                    break;
                }
                SessionState::ChoosingFirstPlayer
                | SessionState::AwaitingRestartDecision
                | SessionState::Closed => break,
            }
        }

        Ok(replies)
    }

    fn apply(&mut self, turn: Turn, index: usize) {
        self.whose_turn = turn;
        self.board = place(&self.board, turn, index);
        self.history.push((turn, index));
        debug!(side = %turn, index, board = %self.board, "move applied");
    }
}
