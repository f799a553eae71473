//! Dashboard state and the transition applied after each polling cycle.
//!
//! The controller is the only writer. Readers get cloned snapshots through
//! the watch channel, so nothing here needs interior mutability.

use chrono::{DateTime, Utc};
use healthdeck_api::HealthError;
use healthdeck_types::{HealthStatus, OverlapPolicy};
use tracing::debug;

/// Everything the render layer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardViewState {
    /// Most recent successfully parsed report. Kept across failures.
    pub last_good_payload: Option<HealthStatus>,
    /// User-facing failure text of the latest applied cycle, if it failed.
    pub connection_error: Option<String>,
    /// True until the first cycle completes.
    pub is_loading: bool,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    /// Cycle number of the latest applied outcome; 0 before any.
    pub last_applied_cycle: u64,
}

impl Default for DashboardViewState {
    fn default() -> Self {
        Self {
            last_good_payload: None,
            connection_error: None,
            is_loading: true,
            last_refreshed_at: None,
            last_success_at: None,
            consecutive_failures: 0,
            last_applied_cycle: 0,
        }
    }
}

/// Result of one fetch, tagged with the cycle that issued it.
#[derive(Debug)]
pub struct CycleOutcome {
    pub cycle: u64,
    pub result: Result<HealthStatus, HealthError>,
    pub completed_at: DateTime<Utc>,
}

impl CycleOutcome {
    pub fn new(cycle: u64, result: Result<HealthStatus, HealthError>) -> Self {
        Self {
            cycle,
            result,
            completed_at: Utc::now(),
        }
    }
}

impl DashboardViewState {
    /// Fold one outcome into the state.
    ///
    /// Returns `false` when the outcome was discarded as stale and the state
    /// is unchanged.
    pub fn apply(&mut self, outcome: CycleOutcome, policy: OverlapPolicy) -> bool {
        if policy == OverlapPolicy::DiscardStale && outcome.cycle < self.last_applied_cycle {
            debug!(
                cycle = outcome.cycle,
                last_applied = self.last_applied_cycle,
                "discarding stale health outcome"
            );
            return false;
        }

        match outcome.result {
            Ok(payload) => {
                self.last_good_payload = Some(payload);
                self.connection_error = None;
                self.last_success_at = Some(outcome.completed_at);
                self.consecutive_failures = 0;
            }
            Err(error) => {
                self.connection_error = Some(error.to_string());
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            }
        }

        self.is_loading = false;
        self.last_refreshed_at = Some(outcome.completed_at);
        self.last_applied_cycle = self.last_applied_cycle.max(outcome.cycle);
        true
    }

    pub fn is_connected(&self) -> bool {
        self.connection_error.is_none()
    }
}
