use std::sync::Arc;

use anyhow::{Context, Result};
use contest::{Contest, RedisStore, Store};

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub contest: Contest,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;

        let store = RedisStore::connect(&config.redis_url)
            .await
            .with_context(|| format!("Failed to connect to Redis at {}", config.redis_url))?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        let contest = Contest::new(store, config.settings());

        Arc::new(Self { config, contest })
    }
}
