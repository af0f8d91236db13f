use std::path::PathBuf;

pub const SYMBOLS_ENV: &str = "COINWATCH_SYMBOLS";
pub const API_KEYS_ENV: &str = "COINWATCH_API_KEYS";
pub const LOG_ENV: &str = "COINWATCH_LOG";

const DEFAULT_SYMBOLS_PATH: &str = "coin-names.txt";
const DEFAULT_API_KEYS_PATH: &str = "api-keys.txt";
const DEFAULT_LOG_PATH: &str = "coinwatch.log";

/// Locations of the two input lists and the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Requested asset symbols, one per line.
    pub symbols_path: PathBuf,
    /// CoinMarketCap API keys, one per line.
    pub api_keys_path: PathBuf,
    /// Log sink. The terminal itself is owned by the table.
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols_path: PathBuf::from(DEFAULT_SYMBOLS_PATH),
            api_keys_path: PathBuf::from(DEFAULT_API_KEYS_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    /// Read configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unset or blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            symbols_path: path(SYMBOLS_ENV, DEFAULT_SYMBOLS_PATH),
            api_keys_path: path(API_KEYS_ENV, DEFAULT_API_KEYS_PATH),
            log_path: path(LOG_ENV, DEFAULT_LOG_PATH),
        }
    }
}
