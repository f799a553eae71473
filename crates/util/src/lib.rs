//! Helpers shared by the Healthdeck binary and dashboard.

pub mod config;
pub mod formatting;
pub mod paths;
pub mod preferences;

pub use config::{ConfigError, ConfigOverrides, DashboardConfig, DEFAULT_POLL_INTERVAL};
pub use formatting::{ACCEPTED_STATUS_VALUES, classify_status, format_bytes, format_clock_time, format_uptime};
pub use paths::{default_log_path, expand_tilde};
pub use preferences::{PreferencesError, UserPreferences};
