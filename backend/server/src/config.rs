use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use contest::Settings;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub vote_cooldown_ms: u64,
    pub leaderboard_limit: usize,
    /// `None` disables the admin routes.
    pub admin_token: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            vote_cooldown_ms: try_load("VOTE_COOLDOWN_MS", "2000")?,
            leaderboard_limit: try_load("LEADERBOARD_LIMIT", "10")?,
            admin_token: read_secret("ADMIN_TOKEN"),
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            vote_cooldown: Duration::from_millis(self.vote_cooldown_ms),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}, admin routes disabled");
        })
        .ok()
        .filter(|token| !token.is_empty())
}
