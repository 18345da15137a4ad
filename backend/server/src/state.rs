use std::sync::Arc;

use tracing::{info, warn};

use super::{
    config::Config,
    database::{Store, init_redis},
    error::AppError,
};

pub struct State {
    pub config: Config,
    pub store: Store,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let store = match &config.db_url {
            Some(db_url) => {
                info!("Connecting to redis...");
                Store::Redis(init_redis(db_url).await?)
            }
            None => {
                warn!("DB_URL not configured, users will only live in memory");
                Store::memory()
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
