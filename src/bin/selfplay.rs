//! Plays batches of games against the engine and reports the results.
//!
//! The computer must never lose; a non-zero player win count exits with 1.

use clap::Parser;
use std::path::PathBuf;
use tictactoe_server::core::Turn;
use tictactoe_server::logging;
use tictactoe_server::selfplay::{run_selfplay, Opponent, SelfPlayConfig};

#[derive(Parser)]
#[command(name = "selfplay")]
struct Args {
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// random | minimax
    #[arg(long, default_value = "random")]
    opponent: Opponent,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Let the player move first in every game instead of alternating
    #[arg(long)]
    player_first: bool,
    /// Directory for the JSON report
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init("info");

    let config = SelfPlayConfig {
        num_games: args.games,
        opponent: args.opponent,
        base_seed: args.seed,
        first_turn: args.player_first.then_some(Turn::Player),
        output_dir: args.save,
    };
    let stats = run_selfplay(&config)?;

    println!("=== Self-Play Results ({}) ===", stats.opponent);
    println!("Games:         {}", stats.total_games);
    println!("Computer wins: {}", stats.computer_wins);
    println!("Draws:         {}", stats.draws);
    println!("Player wins:   {}", stats.player_wins);
    println!("Avg moves:     {:.1}", stats.avg_moves);
    println!("Avg time:      {:.1}ms", stats.avg_time_ms);

    if stats.player_wins > 0 {
        std::process::exit(1);
    }
    Ok(())
}
