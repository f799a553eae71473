//! Pure mapping from [`DashboardViewState`] to the values shown on screen.
//!
//! Nothing here touches the terminal, which keeps every label, figure and
//! indicator testable without a backend. The same view backs the interactive
//! dashboard and the plain-text `status` output.

use std::fmt;

use healthdeck_engine::DashboardViewState;
use healthdeck_types::{HealthStatus, Indicator};
use healthdeck_util::{classify_status, format_bytes, format_clock_time, format_uptime};

pub const LIVE_LABEL: &str = "Live Connection";
pub const DISCONNECTED_LABEL: &str = "API Disconnected";
pub const CONNECTING_LABEL: &str = "Connecting…";

/// Shown next to an infrastructure item when the report has no status for it.
const MISSING_STATUS_TEXT: &str = "offline";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionView {
    pub indicator: Indicator,
    pub label: &'static str,
    /// Local wall-clock time of the last applied cycle.
    pub last_updated: Option<String>,
    /// Local wall-clock time reported by the service itself.
    pub server_time: Option<String>,
    pub consecutive_failures: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub subtext: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraIndicator {
    pub label: &'static str,
    pub description: &'static str,
    pub indicator: Indicator,
    /// Raw status reported by the service, or "offline" when absent.
    pub status_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlag {
    pub label: &'static str,
    pub value: &'static str,
}

/// Feature flags are informational and never change at runtime.
pub const FEATURE_FLAGS: [FeatureFlag; 3] = [
    FeatureFlag {
        label: "Rate Limiting",
        value: "ACTIVE",
    },
    FeatureFlag {
        label: "Error Tracking",
        value: "ENABLED",
    },
    FeatureFlag {
        label: "Auto Recovery",
        value: "ON",
    },
];

/// Everything the dashboard renders for one state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub connection: ConnectionView,
    pub cards: [MetricCard; 4],
    pub infrastructure: [InfraIndicator; 3],
    pub features: [FeatureFlag; 3],
    /// Error text for the bottom banner; `None` hides the banner.
    pub banner: Option<String>,
}

impl DashboardView {
    /// Build the view for `state`.
    ///
    /// Figures come from the last successful report even while the service is
    /// unreachable; with no report at all every figure reads as zero and every
    /// infrastructure indicator is off.
    pub fn from_state(state: &DashboardViewState) -> Self {
        let empty = HealthStatus::default();
        let report = state.last_good_payload.as_ref().unwrap_or(&empty);

        let label = if !state.is_connected() {
            DISCONNECTED_LABEL
        } else if state.is_loading {
            CONNECTING_LABEL
        } else {
            LIVE_LABEL
        };

        let connection = ConnectionView {
            indicator: Indicator::from(state.is_connected()),
            label,
            last_updated: state.last_refreshed_at.map(format_clock_time),
            server_time: report.server_time().map(format_clock_time),
            consecutive_failures: state.consecutive_failures,
        };

        Self {
            connection,
            cards: metric_cards(report),
            infrastructure: infrastructure(report),
            features: FEATURE_FLAGS,
            banner: state.connection_error.clone(),
        }
    }
}

fn metric_cards(report: &HealthStatus) -> [MetricCard; 4] {
    [
        MetricCard {
            title: "Active Connections",
            value: report.online_count().to_string(),
            subtext: "Users currently connected".to_string(),
        },
        MetricCard {
            title: "In Queue",
            value: report.queue_count().to_string(),
            subtext: "Waiting to be matched".to_string(),
        },
        MetricCard {
            title: "Heap Memory",
            value: format_bytes(report.heap_bytes()),
            subtext: format!("Stack: {}", format_bytes(report.stack_bytes())),
        },
        MetricCard {
            title: "Uptime",
            value: format_uptime(report.uptime_seconds()),
            subtext: format!("Workers: {}", report.concurrency_count()),
        },
    ]
}

fn infrastructure(report: &HealthStatus) -> [InfraIndicator; 3] {
    let item = |label, description, status: Option<&String>| InfraIndicator {
        label,
        description,
        indicator: classify_status(status.map(String::as_str)),
        status_text: status.cloned().unwrap_or_else(|| MISSING_STATUS_TEXT.to_string()),
    };
    [
        item(
            "Service Core",
            "Request processing and handlers",
            report.overall_status.as_ref(),
        ),
        item("Database", "Persistence layer", report.database_status.as_ref()),
        item("Cache", "Queue management and session state", report.cache_status.as_ref()),
    ]
}

impl fmt::Display for DashboardView {
    /// Plain-text rendering used by `healthdeck status`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = |indicator: Indicator| if indicator.is_on() { "●" } else { "○" };

        write!(f, "{} {}", marker(self.connection.indicator), self.connection.label)?;
        if let Some(updated) = &self.connection.last_updated {
            write!(f, "  (last updated {updated})")?;
        }
        writeln!(f)?;
        if let Some(server_time) = &self.connection.server_time {
            writeln!(f, "Server time: {server_time}")?;
        }

        writeln!(f)?;
        for card in &self.cards {
            writeln!(f, "{:<20}{:>12}   {}", card.title, card.value, card.subtext)?;
        }

        writeln!(f)?;
        writeln!(f, "Infrastructure")?;
        for item in &self.infrastructure {
            writeln!(f, "  {} {:<14}{}", marker(item.indicator), item.label, item.status_text)?;
        }

        writeln!(f)?;
        writeln!(f, "Security & Performance")?;
        for flag in &self.features {
            writeln!(f, "  {:<16}{}", flag.label, flag.value)?;
        }

        if let Some(banner) = &self.banner {
            writeln!(f)?;
            writeln!(f, "! {banner}")?;
        }
        Ok(())
    }
}
