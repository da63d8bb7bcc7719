use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_server::config::{ServerConfig, DEFAULT_CONFIG_PATH, DEFAULT_PORT};
use tictactoe_server::logging;
use tictactoe_server::network::{start_server, NetworkClient};

#[derive(Parser)]
#[command(name = "tictactoe-server", about = "Tic-tac-toe against a perfect opponent over TCP")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for players
    Serve {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        max_sessions: Option<usize>,
        /// Seed for the first-player coin flip
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play against a running server from this terminal
    Connect {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Serve {
            config,
            host,
            port,
            max_sessions,
            seed,
        } => {
            let mut config = ServerConfig::load_or_default(&config).with_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(n) = max_sessions {
                config.max_sessions = n;
            }
            if seed.is_some() {
                config.seed = seed;
            }

            logging::init(&config.log_filter);
            start_server(config).await
        }
        Command::Connect { host, port } => {
            logging::init("warn");

            let addr = format!("{host}:{port}");
            println!("Connecting to {addr}...");
            let client = NetworkClient::connect(&addr).await?;
            println!("Connected! X is you, O is the computer.");

            let summary = client.run().await?;
            println!(
                "Played {} game(s): {} won, {} lost, {} tied.",
                summary.games(),
                summary.wins,
                summary.losses,
                summary.ties
            );
            Ok(())
        }
    }
}
