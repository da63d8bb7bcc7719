//! Batch games between the search engine and a scripted opponent.
//!
//! Used as an end-to-end check of the engine: against any opponent the
//! computer must never lose.

use crate::core::{Board, GameOutcome, Turn};
use crate::logic::{legal_moves, outcome, try_place};
use crate::player::{MinimaxAI, PlayerController, RandomAI};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opponent {
    Random,
    Minimax,
}

impl FromStr for Opponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Opponent::Random),
            "minimax" => Ok(Opponent::Minimax),
            other => Err(format!("unknown opponent {other:?} (random|minimax)")),
        }
    }
}

impl fmt::Display for Opponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Opponent::Random => write!(f, "random"),
            Opponent::Minimax => write!(f, "minimax"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    pub opponent: Opponent,
    pub base_seed: u64,
    /// `None` alternates the first mover game by game.
    pub first_turn: Option<Turn>,
    pub output_dir: Option<PathBuf>,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            num_games: 100,
            opponent: Opponent::Random,
            base_seed: 0,
            first_turn: None,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub game: usize,
    pub first_turn: Turn,
    pub outcome: GameOutcome,
    pub moves: usize,
    pub final_board: Board,
    pub time_ms: u128,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfPlayStats {
    pub total_games: usize,
    pub player_wins: usize,
    pub computer_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
    pub avg_time_ms: f64,
    pub opponent: String,
    pub games: Vec<GameResult>,
}

impl SelfPlayStats {
    pub fn new(opponent: Opponent) -> Self {
        Self {
            opponent: opponent.to_string(),
            ..Self::default()
        }
    }

    pub fn add_result(&mut self, result: GameResult) {
        self.total_games += 1;
        match result.outcome {
            GameOutcome::PlayerWin => self.player_wins += 1,
            GameOutcome::ComputerWin => self.computer_wins += 1,
            _ => self.draws += 1,
        }
        self.games.push(result);
        self.recalculate_averages();
    }

    fn recalculate_averages(&mut self) {
        if self.games.is_empty() {
            return;
        }
        let total_moves: usize = self.games.iter().map(|g| g.moves).sum();
        let total_time: u128 = self.games.iter().map(|g| g.time_ms).sum();
        self.avg_moves = total_moves as f64 / self.games.len() as f64;
        self.avg_time_ms = total_time as f64 / self.games.len() as f64;
    }
}

pub fn run_selfplay(config: &SelfPlayConfig) -> anyhow::Result<SelfPlayStats> {
    info!(
        games = config.num_games,
        opponent = %config.opponent,
        seed = config.base_seed,
        "self-play started"
    );

    let results = (0..config.num_games)
        .into_par_iter()
        .map(|game| -> anyhow::Result<GameResult> {
            let first_turn = config.first_turn.unwrap_or(if game % 2 == 0 {
                Turn::Player
            } else {
                Turn::Computer
            });
            let computer = MinimaxAI::new(Turn::Computer, "Minimax AI");
            let player: Box<dyn PlayerController> = match config.opponent {
                Opponent::Random => Box::new(RandomAI::new(
                    Turn::Player,
                    "Random AI",
                    Some(config.base_seed.wrapping_add(game as u64)),
                )),
                Opponent::Minimax => Box::new(MinimaxAI::new(Turn::Player, "Minimax AI (player)")),
            };

            let start_time = Instant::now();
            let (result, final_board) =
                play_game(&computer, player.as_ref(), Board::new(), first_turn)?;
            debug!(game, %result, board = %final_board, "self-play game done");

            Ok(GameResult {
                game,
                first_turn,
                outcome: result,
                moves: final_board.move_count(),
                final_board,
                time_ms: start_time.elapsed().as_millis(),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut stats = SelfPlayStats::new(config.opponent);
    for result in results {
        stats.add_result(result);
    }

    info!(
        player_wins = stats.player_wins,
        computer_wins = stats.computer_wins,
        draws = stats.draws,
        "self-play finished"
    );

    if let Some(dir) = &config.output_dir {
        let path = save_stats(&stats, dir)?;
        info!(path = %path.display(), "self-play results saved");
    }

    Ok(stats)
}

/// Plays `start` out to the end. Both controllers place their own mark.
pub fn play_game(
    computer: &dyn PlayerController,
    player: &dyn PlayerController,
    start: Board,
    first_turn: Turn,
) -> anyhow::Result<(GameOutcome, Board)> {
    let mut board = start;
    let mut current = first_turn;

    loop {
        let result = outcome(&board);
        if result.is_over() {
            return Ok((result, board));
        }

        let controller = match current {
            Turn::Computer => computer,
            _ => player,
        };
        let moves = legal_moves(&board);
        let chosen = controller.choose_move(&board, &moves).ok_or_else(|| {
            anyhow::anyhow!("{} returned no move on {}", controller.name(), board)
        })?;

        board = try_place(&board, controller.side(), chosen)?;
        current = current.opponent();
    }
}

fn save_stats(stats: &SelfPlayStats, dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let filename = format!(
        "selfplay_{}_{}.json",
        stats.opponent,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, stats)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_opponent_never_wins() {
        let config = SelfPlayConfig {
            num_games: 40,
            base_seed: 1234,
            ..SelfPlayConfig::default()
        };
        let stats = run_selfplay(&config).unwrap();

        assert_eq!(stats.total_games, 40);
        assert_eq!(stats.player_wins, 0);
        assert_eq!(stats.computer_wins + stats.draws, 40);
        assert!(stats.avg_moves >= 5.0);
        // results stay in game order
        assert!(stats.games.iter().enumerate().all(|(i, g)| g.game == i));
    }

    #[test]
    fn test_player_first_against_random() {
        let config = SelfPlayConfig {
            num_games: 30,
            base_seed: 99,
            first_turn: Some(Turn::Player),
            ..SelfPlayConfig::default()
        };
        let stats = run_selfplay(&config).unwrap();
        assert_eq!(stats.player_wins, 0);
        assert!(stats.games.iter().all(|g| g.first_turn == Turn::Player));
    }

    #[test]
    fn test_center_opening_against_random() {
        let opened = crate::logic::place(&Board::new(), Turn::Computer, 4);
        let computer = MinimaxAI::new(Turn::Computer, "c");
        for seed in 0..30 {
            let player = RandomAI::new(Turn::Player, "r", Some(seed));
            let (result, _) = play_game(&computer, &player, opened, Turn::Player).unwrap();
            assert_ne!(result, GameOutcome::PlayerWin, "seed {seed}");
        }
    }

    #[test]
    fn test_perfect_play_is_a_draw() {
        let computer = MinimaxAI::new(Turn::Computer, "c");
        let player = MinimaxAI::new(Turn::Player, "p");
        for first in [Turn::Player, Turn::Computer] {
            let (result, board) = play_game(&computer, &player, Board::new(), first).unwrap();
            assert_eq!(result, GameOutcome::Draw);
            assert_eq!(board.move_count(), 9);
        }
    }

    #[test]
    fn test_results_saved_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = SelfPlayConfig {
            num_games: 2,
            output_dir: Some(dir.path().to_path_buf()),
            ..SelfPlayConfig::default()
        };
        run_selfplay(&config).unwrap();

        let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let text = std::fs::read_to_string(entry.path()).unwrap();
        let saved: SelfPlayStats = serde_json::from_str(&text).unwrap();
        assert_eq!(saved.total_games, 2);
        assert_eq!(saved.opponent, "random");
        assert_eq!(saved.games[0].final_board.move_count(), saved.games[0].moves);
    }

    #[test]
    fn test_opponent_from_str() {
        assert_eq!("Random".parse::<Opponent>(), Ok(Opponent::Random));
        assert_eq!("minimax".parse::<Opponent>(), Ok(Opponent::Minimax));
        assert!("alpha-beta".parse::<Opponent>().is_err());
    }
}
