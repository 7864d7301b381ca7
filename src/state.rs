use std::sync::Arc;

use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::auth::sessions::SessionStore;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        let sessions = Arc::new(SessionStore::new(config.session_ttl_minutes));
        Ok(Self {
            db,
            config,
            sessions,
        })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_ttl_minutes));
        Self {
            db,
            config,
            sessions,
        }
    }
}
