use std::path::PathBuf;
use std::time::Duration;

use crate::LogError;

pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug)]
pub struct Config {
    /// JSON-lines log file; `None` keeps entries in memory only.
    pub data_file: Option<PathBuf>,
    pub recent_limit: usize,
    /// How long the UI keeps the confirmation visible before resetting the form.
    pub reset_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, LogError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, LogError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let data_file = get("EDGECARE_DATA_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let recent_limit = match get("EDGECARE_RECENT_LIMIT") {
            Some(raw) => parse_number(&raw, "EDGECARE_RECENT_LIMIT")?,
            None => DEFAULT_RECENT_LIMIT,
        };
        let reset_delay = match get("EDGECARE_RESET_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_number(&raw, "EDGECARE_RESET_DELAY_MS")?),
            None => DEFAULT_RESET_DELAY,
        };
        Ok(Self {
            data_file,
            recent_limit,
            reset_delay,
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, LogError> {
    raw.trim()
        .parse()
        .map_err(|_| LogError::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}
