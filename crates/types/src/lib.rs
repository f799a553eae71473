//! Shared types for the Healthdeck dashboard.
//!
//! The structs in this crate mirror the JSON body returned by a service's
//! `/health` endpoint. Every field is optional on the wire: the service may
//! omit sections, and callers decide (through [`PayloadPolicy`]) whether an
//! incomplete report is acceptable or should be treated as malformed.
//!
//! Decoding never fails on a field of the wrong type: such a field reads as
//! absent, exactly like a missing one. Numbers sent as floats or numeric
//! strings are accepted and truncated to whole units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level keys a complete health report is expected to carry.
pub const REQUIRED_PAYLOAD_KEYS: &[&str] = &["status", "database", "redis", "stats", "system"];

/// Parsed body of `GET {base_url}/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall service state (e.g. "ok").
    #[serde(rename = "status", default, deserialize_with = "lenient::text")]
    pub overall_status: Option<String>,
    /// Database connectivity state.
    #[serde(rename = "database", default, deserialize_with = "lenient::text")]
    pub database_status: Option<String>,
    /// Cache connectivity state.
    #[serde(rename = "redis", default, deserialize_with = "lenient::text")]
    pub cache_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub stats: Option<ServiceStats>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub system: Option<SystemStats>,
    /// RFC 3339 time at which the service produced the report.
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
}

/// Usage counters reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    #[serde(rename = "total_user_online", default, deserialize_with = "lenient::count")]
    pub online_count: Option<u64>,
    #[serde(rename = "total_user_queue", default, deserialize_with = "lenient::count")]
    pub queue_count: Option<u64>,
}

/// Process-level resource figures reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(rename = "heap_alloc", default, deserialize_with = "lenient::count")]
    pub heap_bytes: Option<u64>,
    #[serde(rename = "stack_in_use", default, deserialize_with = "lenient::count")]
    pub stack_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub uptime_seconds: Option<u64>,
    /// Number of concurrent workers (goroutines, tasks, threads).
    #[serde(rename = "goroutines", default, deserialize_with = "lenient::count")]
    pub concurrency_count: Option<u64>,
}

impl HealthStatus {
    pub fn online_count(&self) -> u64 {
        self.stats.as_ref().and_then(|stats| stats.online_count).unwrap_or(0)
    }

    pub fn queue_count(&self) -> u64 {
        self.stats.as_ref().and_then(|stats| stats.queue_count).unwrap_or(0)
    }

    pub fn heap_bytes(&self) -> u64 {
        self.system.as_ref().and_then(|system| system.heap_bytes).unwrap_or(0)
    }

    pub fn stack_bytes(&self) -> u64 {
        self.system.as_ref().and_then(|system| system.stack_bytes).unwrap_or(0)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.system.as_ref().and_then(|system| system.uptime_seconds).unwrap_or(0)
    }

    pub fn concurrency_count(&self) -> u64 {
        self.system.as_ref().and_then(|system| system.concurrency_count).unwrap_or(0)
    }

    /// Parses the server-reported timestamp, ignoring values that are not RFC 3339.
    pub fn server_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw.trim()).ok().map(|time| time.with_timezone(&Utc))
    }

    /// Decode a report from any JSON value.
    ///
    /// A body that is not an object (`null`, an array, a bare number) yields
    /// an empty report.
    pub fn from_json_value(value: Value) -> Self {
        if value.is_object() {
            serde_json::from_value(value).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Lists the top-level wire keys that are absent from this report.
    ///
    /// Used by [`PayloadPolicy::Strict`] to reject partial reports.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let present = [
            self.overall_status.is_some(),
            self.database_status.is_some(),
            self.cache_status.is_some(),
            self.stats.is_some(),
            self.system.is_some(),
        ];
        REQUIRED_PAYLOAD_KEYS
            .iter()
            .zip(present)
            .filter_map(|(key, is_present)| (!is_present).then_some(*key))
            .collect()
    }
}

/// How to treat a health report with missing sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPolicy {
    /// Missing numbers read as zero and missing statuses read as down.
    #[default]
    Lenient,
    /// Any missing top-level section makes the report malformed.
    Strict,
}

/// What to do with a poll response that completes after a newer one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Drop responses from cycles older than the last applied cycle.
    #[default]
    DiscardStale,
    /// Apply every response in completion order.
    LastCompletionWins,
}

/// Binary on/off state of a status light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    On,
    Off,
}

impl Indicator {
    pub fn is_on(self) -> bool {
        matches!(self, Indicator::On)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Indicator::On => "on",
            Indicator::Off => "off",
        }
    }
}

impl From<bool> for Indicator {
    fn from(value: bool) -> Self {
        if value { Indicator::On } else { Indicator::Off }
    }
}

/// Field decoders that map a type mismatch to `None` instead of an error.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(text)) => Some(text),
            _ => None,
        })
    }

    pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(as_count))
    }

    pub(crate) fn section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Value>::deserialize(deserializer)?
            .filter(Value::is_object)
            .and_then(|value| serde_json::from_value(value).ok()))
    }

    fn as_count(value: &Value) -> Option<u64> {
        match value {
            Value::Number(number) => number.as_u64().or_else(|| number.as_f64().and_then(whole_units)),
            Value::String(text) => {
                let text = text.trim();
                text.parse::<u64>().ok().or_else(|| text.parse::<f64>().ok().and_then(whole_units))
            }
            _ => None,
        }
    }

    fn whole_units(value: f64) -> Option<u64> {
        (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
    }
}
