//! Dashboard configuration resolution.
//!
//! Each setting is taken from the first source that provides it:
//! command-line flag, environment variable, compile-time default (base URL
//! only), user preferences file, then the built-in default. Environment
//! lookups go through a caller-supplied function so resolution stays
//! deterministic under test.

use std::env;
use std::time::Duration;

use healthdeck_api::{DEFAULT_REQUEST_TIMEOUT, LocationProvider, RuntimeLocation, resolve_base_url};
use healthdeck_types::{OverlapPolicy, PayloadPolicy};
use thiserror::Error;
use tracing::warn;

use crate::preferences::UserPreferences;

pub const BASE_URL_ENV: &str = "HEALTHDECK_API_BASE_URL";
pub const HOST_ENV: &str = "HEALTHDECK_HOST";
pub const INTERVAL_ENV: &str = "HEALTHDECK_INTERVAL_MS";
pub const TIMEOUT_ENV: &str = "HEALTHDECK_TIMEOUT_MS";
pub const STRICT_PAYLOAD_ENV: &str = "HEALTHDECK_STRICT_PAYLOAD";
pub const THEME_ENV: &str = "TUI_THEME";

/// Base URL baked in at build time, if any.
pub const BUILD_TIME_BASE_URL: Option<&str> = option_env!("HEALTHDECK_API_BASE_URL");

/// Default delay between polling cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    BaseUrl(#[from] healthdeck_api::ConfigError),
    #[error("invalid value '{value}' for {setting}: expected a positive number of milliseconds")]
    InvalidMillis { setting: &'static str, value: String },
}

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub strict_payload: bool,
    pub keep_late_responses: bool,
    pub theme: Option<String>,
}

/// Fully resolved settings for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub payload_policy: PayloadPolicy,
    pub overlap_policy: OverlapPolicy,
    pub theme: Option<String>,
}

impl DashboardConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: &ConfigOverrides, preferences: &UserPreferences) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, preferences, BUILD_TIME_BASE_URL, |name| env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup and build-time base URL.
    pub fn resolve_with<E>(
        overrides: &ConfigOverrides,
        preferences: &UserPreferences,
        build_time_base_url: Option<&str>,
        lookup_env: E,
    ) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let explicit_base_url = non_blank(overrides.base_url.clone())
            .or_else(|| non_blank(lookup_env(BASE_URL_ENV)))
            .or_else(|| non_blank(build_time_base_url.map(str::to_string)))
            .or_else(|| non_blank(preferences.base_url()));
        let location = non_blank(overrides.host.clone())
            .or_else(|| non_blank(lookup_env(HOST_ENV)))
            .and_then(|host| RuntimeLocation::from_host(&host));
        let base_url = resolve_base_url(
            explicit_base_url.as_deref(),
            location.as_ref().map(|loc| loc as &dyn LocationProvider),
        )?;

        let poll_interval = resolve_millis(overrides.interval_ms, INTERVAL_ENV, &lookup_env)?.unwrap_or(DEFAULT_POLL_INTERVAL);
        let request_timeout = resolve_millis(overrides.timeout_ms, TIMEOUT_ENV, &lookup_env)?.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout >= poll_interval {
            warn!(
                timeout_ms = request_timeout.as_millis() as u64,
                interval_ms = poll_interval.as_millis() as u64,
                "request timeout is not shorter than the poll interval; cycles may overlap"
            );
        }

        let strict = overrides.strict_payload || lookup_env(STRICT_PAYLOAD_ENV).is_some_and(|value| is_truthy(value.trim()));
        let payload_policy = if strict { PayloadPolicy::Strict } else { PayloadPolicy::Lenient };
        let overlap_policy = if overrides.keep_late_responses {
            OverlapPolicy::LastCompletionWins
        } else {
            OverlapPolicy::DiscardStale
        };

        let theme = non_blank(overrides.theme.clone())
            .or_else(|| non_blank(lookup_env(THEME_ENV)))
            .or_else(|| non_blank(preferences.preferred_theme()));

        Ok(Self {
            base_url,
            poll_interval,
            request_timeout,
            payload_policy,
            overlap_policy,
            theme,
        })
    }
}

fn resolve_millis<E>(flag: Option<u64>, env_name: &'static str, lookup_env: &E) -> Result<Option<Duration>, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let millis = match flag {
        Some(value) => Some(value),
        None => match non_blank(lookup_env(env_name)) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidMillis {
                setting: env_name,
                value: raw.clone(),
            })?),
            None => None,
        },
    };
    match millis {
        Some(0) => Err(ConfigError::InvalidMillis {
            setting: env_name,
            value: "0".to_string(),
        }),
        other => Ok(other.map(Duration::from_millis)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on" | "enable" | "enabled")
}
