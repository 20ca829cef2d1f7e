use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_address: String,
    pub public_base_url: String,
    pub database_max_connections: u32,
    pub database_timeout_ms: u64,
    pub session_ttl: Duration,
}

impl Config {
    /// Reads the process environment. Panics on a missing or malformed variable,
    /// so call it once at startup.
    pub fn load() -> Self {
        let public_base_url: String = try_load("PUBLIC_BASE_URL", "https://nobull.fit");
        Self {
            database_url: get_env("DATABASE_URL"),
            jwt_secret: get_env("JWT_SECRET"),
            server_address: try_load("SERVER_ADDRESS", "0.0.0.0:3000"),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", "20"),
            database_timeout_ms: try_load("DATABASE_TIMEOUT_MS", "300"),
            session_ttl: Duration::from_secs(try_load("SESSION_TTL_SECS", "604800")),
        }
    }
}

pub fn get_env(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("Environment variable {} is required", name))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value
        .parse()
        .unwrap_or_else(|err| panic!("Invalid {key} value {value:?}: {err}"))
}
