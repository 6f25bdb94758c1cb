use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub tablebase_url: String,
    pub tablebase_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:database.db".to_string()),
            tablebase_url: env::var("TABLEBASE_URL")
                .unwrap_or_else(|_| "http://tablebase.lichess.ovh".to_string()),
            tablebase_timeout_secs: env::var("TABLEBASE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }
}
