use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Hard cap on the day-by-day next-occurrence search, in days.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 15;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to a TOML catalog file (`SKYSCHED_CATALOG`).
    /// None means the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    /// Lookahead bound for next-occurrence searches (`SKYSCHED_LOOKAHEAD_DAYS`).
    pub lookahead_days: u32,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            catalog_path: env_opt("SKYSCHED_CATALOG").map(PathBuf::from),
            lookahead_days: env_u32("SKYSCHED_LOOKAHEAD_DAYS", DEFAULT_LOOKAHEAD_DAYS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}
