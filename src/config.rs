use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:frontdesk.db?mode=rwc".into());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse().context("APP_PORT must be a port number")?,
            Err(_) => 8080,
        };
        let session_ttl_minutes = match std::env::var("SESSION_TTL_MINUTES") {
            Ok(v) => v
                .parse()
                .context("SESSION_TTL_MINUTES must be a number of minutes")?,
            Err(_) => 60 * 24,
        };
        Ok(Self {
            database_url,
            host,
            port,
            session_ttl_minutes,
        })
    }
}
