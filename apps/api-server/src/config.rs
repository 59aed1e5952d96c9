//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` when `DATABASE_URL` is unset; the in-memory store is used then.
    pub database_url: Option<String>,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Category slugs created at startup when running in memory.
    pub seed_categories: Vec<String>,
    /// Location names created at startup when running in memory.
    pub seed_locations: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        #[cfg(feature = "postgres")]
        let database = database_url.clone().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 100),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 10),
            sql_logging: parse_var("DB_SQL_LOGGING", false),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database_url,
            #[cfg(feature = "postgres")]
            database,
            seed_categories: list_var("SEED_CATEGORIES", "general"),
            seed_locations: list_var("SEED_LOCATIONS", ""),
        }
    }
}

/// Comma-separated list, blanks dropped.
fn list_var(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
