//! Environment configuration, overridden by command-line flags.
use std::env;
use std::path::PathBuf;

use dw_core::Scale;

/// Settings that may come from the environment.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub scale: Option<Scale>,
    pub session: Option<String>,
}

impl Config {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOORWAY_DATA_DIR` - directory for save files and rendered maps
    /// - `DOORWAY_SCALE` - pixels per grid cell (default: 10)
    /// - `DOORWAY_SESSION` - session id (default: "default")
    pub fn from_env() -> Self {
        Self {
            data_dir: read_env::<PathBuf>("DOORWAY_DATA_DIR"),
            scale: read_env::<u32>("DOORWAY_SCALE").and_then(Scale::new),
            session: read_env::<String>("DOORWAY_SESSION").filter(|s| !s.is_empty()),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
