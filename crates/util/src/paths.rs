use std::env;
use std::path::PathBuf;

use dirs_next::{data_local_dir, home_dir};

/// Environment variable overriding where diagnostics are written in dashboard mode.
pub const LOG_PATH_ENV: &str = "HEALTHDECK_LOG_PATH";

const LOG_FILE_NAME: &str = "healthdeck.log";

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Log file used while the terminal dashboard owns the screen.
pub fn default_log_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join("healthdeck")
        .join(LOG_FILE_NAME)
}
