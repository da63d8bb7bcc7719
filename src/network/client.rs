use crate::core::{Board, GameOutcome};
use crate::display::{new_computer_mark, outcome_message, render_board, DisplayState};
use crate::game::RestartDecision;
use crate::network::protocol::{encode_decision, ServerMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Terminal front end: shows boards, reads cell numbers from the user.
pub struct NetworkClient {
    stream: TcpStream,
}

impl NetworkClient {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream })
    }

    pub async fn run(self) -> anyhow::Result<ClientSummary> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Plays with `input` standing in for the user's keyboard.
    pub async fn run_with<I>(mut self, input: I) -> anyhow::Result<ClientSummary>
    where
        I: AsyncBufRead + Unpin,
    {
        let (reader, mut writer) = self.stream.split();
        let mut lines = BufReader::new(reader).lines();
        let mut input = input.lines();
        let mut summary = ClientSummary::default();
        let mut last_board = Board::new();

        while let Some(line) = lines.next_line().await? {
            match ServerMessage::parse(&line) {
                ServerMessage::Board(board) => {
                    let state = DisplayState {
                        status_msg: Some("Your move (0-8):".to_string()),
                        last_move: new_computer_mark(&last_board, &board),
                        ..DisplayState::default()
                    };
                    render_board(&board, &state)?;
                    last_board = board;

                    let Some(answer) = input.next_line().await? else {
                        debug!("input closed, leaving");
                        break;
                    };
                    writer
                        .write_all(format!("{}\n", answer.trim()).as_bytes())
                        .await?;
                }
                ServerMessage::Outcome(result) => {
                    summary.add_result(result);
                    println!("{}", outcome_message(result));
                    println!("Play again? [y/n]");

                    let decision = match input.next_line().await? {
                        Some(answer) if is_yes(&answer) => RestartDecision::NewGame,
                        _ => RestartDecision::Close,
                    };
                    writer.write_all(encode_decision(decision).as_bytes()).await?;
                    if decision == RestartDecision::Close {
                        break;
                    }
                    last_board = Board::new();
                }
                ServerMessage::Unknown(text) => {
                    warn!(%text, "unexpected line from server");
                }
            }
        }

        writer.shutdown().await?;
        Ok(summary)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Results seen by the client over one connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSummary {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl ClientSummary {
    fn add_result(&mut self, result: GameOutcome) {
        match result {
            GameOutcome::PlayerWin => self.wins += 1,
            GameOutcome::ComputerWin => self.losses += 1,
            GameOutcome::Draw => self.ties += 1,
            GameOutcome::Ongoing => {}
        }
    }

    pub fn games(&self) -> usize {
        self.wins + self.losses + self.ties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ClientSummary::default();
        summary.add_result(GameOutcome::Draw);
        summary.add_result(GameOutcome::ComputerWin);
        summary.add_result(GameOutcome::Ongoing);
        assert_eq!(summary.games(), 2);
        assert_eq!(summary.ties, 1);
        assert_eq!(summary.losses, 1);
    }
}
