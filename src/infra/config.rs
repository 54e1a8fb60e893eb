//! Centralized configuration (environment variables + defaults).

use std::time::Duration;

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 8000;

/// Pool size used when `DB_MAX_CONNECTIONS` is unset or unparsable.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Seconds a request waits for a database connection when `DB_ACQUIRE_TIMEOUT_SECS` is unset.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Loads `.env` into the process environment if one exists.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

/// Database connection string (optional).
///
/// `postgres://...` selects the Postgres store, `memory://` the in-process store.
pub fn database_url() -> Option<String> {
    non_empty_var("DATABASE_URL")
}

/// Database name (optional). Overrides the database named in `DATABASE_URL`.
pub fn database_name() -> Option<String> {
    non_empty_var("DATABASE_NAME")
}

/// HTTP port, defaults to 8000.
pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Maximum pool connections for the Postgres store.
pub fn max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .map(|v| v.max(1))
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}

/// How long a request waits for a pooled connection before failing.
pub fn acquire_timeout() -> Duration {
    let secs = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);
    Duration::from_secs(secs.max(1))
}

/// Base log level; `RUST_LOG` still wins when set.
pub fn log_level() -> String {
    non_empty_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
