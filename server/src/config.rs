use std::{env, str::FromStr, time::Duration};

use tracing::warn;

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub move_retry_limit: u32,
    pub move_retry_backoff: Duration,
    pub max_board_cells: usize,
    pub games_per_minute: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            move_retry_limit: 16,
            move_retry_backoff: Duration::from_millis(5),
            max_board_cells: 10_000,
            games_per_minute: 10,
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_allowed_origins);

        Self {
            move_retry_limit: var_or("MOVE_RETRY_LIMIT", defaults.move_retry_limit),
            move_retry_backoff: Duration::from_millis(var_or(
                "MOVE_RETRY_BACKOFF_MS",
                defaults.move_retry_backoff.as_millis() as u64,
            )),
            max_board_cells: var_or("MAX_BOARD_CELLS", defaults.max_board_cells),
            games_per_minute: var_or("RATE_LIMIT_GAMES_PER_MINUTE", defaults.games_per_minute),
            cors_allowed_origins,
        }
    }
}
