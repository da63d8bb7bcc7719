use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "server_config.json";
pub const DEFAULT_PORT: u16 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 同時に処理するセッション数 (1 = 一人ずつ)
    pub max_sessions: usize,
    /// Seed for the first-player coin. Each session gets `seed + n`.
    pub seed: Option<u64>,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_sessions: 1,
            seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config: ServerConfig = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "bad config file, using defaults"
                    );
                }
                Self::default()
            }
        }
    }

    /// Applies `TICTACTOE_*` environment overrides.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = var("TICTACTOE_HOST").filter(|s| !s.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = var("TICTACTOE_PORT").and_then(|s| s.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(n) = var("TICTACTOE_MAX_SESSIONS").and_then(|s| s.trim().parse().ok()) {
            self.max_sessions = n;
        }
        if let Some(seed) = var("TICTACTOE_SEED").and_then(|s| s.trim().parse().ok()) {
            self.seed = Some(seed);
        }
        self
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
