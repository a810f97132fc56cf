use std::env;

// ============================================================================
// Configuration
// ============================================================================
//
// Everything is env-driven with defaults that work on a laptop:
// - DATABASE_URL        Postgres connection string; when absent the binary
//                       runs entirely on the in-memory stores
// - METRICS_PORT        where /metrics and /health are served
// - DB_MAX_CONNECTIONS  sqlx pool size
//
// ============================================================================

const DEFAULT_METRICS_PORT: u16 = 9090;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub metrics_port: u16,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let metrics_port = env::var("METRICS_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_METRICS_PORT);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        Self {
            database_url,
            metrics_port,
            db_max_connections,
        }
    }
}
