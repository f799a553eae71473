//! Background polling of the health endpoint.
//!
//! [`PollingController::start`] spawns a single loop task that owns the
//! [`DashboardViewState`]. Every tick (and every manual refresh) spawns an
//! independent fetch tagged with a cycle number; the loop folds completed
//! fetches into the state and publishes the result on a watch channel. A slow
//! fetch therefore never delays the next tick.

use std::sync::Arc;
use std::time::Duration;

use healthdeck_types::OverlapPolicy;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::HealthSource;
use crate::state::{CycleOutcome, DashboardViewState};

/// Default delay between cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    pub interval: Duration,
    pub overlap_policy: OverlapPolicy,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            overlap_policy: OverlapPolicy::DiscardStale,
        }
    }
}

#[derive(Debug)]
enum Command {
    RefreshNow,
}

/// Periodically fetches health reports from a [`HealthSource`].
pub struct PollingController<S> {
    source: Arc<S>,
    settings: PollerSettings,
}

impl<S: HealthSource> PollingController<S> {
    pub fn new(source: S, settings: PollerSettings) -> Self {
        Self::from_shared(Arc::new(source), settings)
    }

    pub fn from_shared(source: Arc<S>, settings: PollerSettings) -> Self {
        Self { source, settings }
    }

    /// Spawn the polling loop on the current tokio runtime.
    ///
    /// The first fetch is issued immediately.
    pub fn start(self) -> PollingHandle {
        let (state_tx, state_rx) = watch::channel(DashboardViewState::default());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        info!(
            interval_ms = self.settings.interval.as_millis() as u64,
            overlap_policy = ?self.settings.overlap_policy,
            "health polling started"
        );
        let task = tokio::spawn(self.run(state_tx, command_rx, cancel.child_token()));

        PollingHandle {
            state_rx,
            commands: command_tx,
            cancel,
            task: Some(task),
        }
    }

    async fn run(
        self,
        state_tx: watch::Sender<DashboardViewState>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        cancel: CancellationToken,
    ) {
        let mut ticker = time::interval(self.settings.interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Dropping the set on exit aborts fetches that are still running.
        let mut in_flight: JoinSet<CycleOutcome> = JoinSet::new();
        let mut next_cycle: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(joined) = in_flight.join_next() => match joined {
                    Ok(outcome) => {
                        let policy = self.settings.overlap_policy;
                        state_tx.send_if_modified(|state| state.apply(outcome, policy));
                    }
                    Err(error) => warn!(%error, "health fetch task failed"),
                },
                _ = ticker.tick() => self.spawn_cycle(&mut in_flight, &mut next_cycle),
                Some(command) = commands.recv() => match command {
                    Command::RefreshNow => {
                        debug!("manual refresh requested");
                        self.spawn_cycle(&mut in_flight, &mut next_cycle);
                    }
                },
            }
        }

        info!(in_flight = in_flight.len(), "health polling stopped");
    }

    fn spawn_cycle(&self, in_flight: &mut JoinSet<CycleOutcome>, next_cycle: &mut u64) {
        *next_cycle += 1;
        let cycle = *next_cycle;
        let source = Arc::clone(&self.source);
        debug!(cycle, "starting health cycle");
        in_flight.spawn(async move { CycleOutcome::new(cycle, source.fetch().await) });
    }
}

/// Handle to a running [`PollingController`].
///
/// Dropping the handle stops polling without waiting for the loop to exit.
#[derive(Debug)]
pub struct PollingHandle {
    state_rx: watch::Receiver<DashboardViewState>,
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    /// A receiver that is notified whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardViewState> {
        self.state_rx.clone()
    }

    pub fn snapshot(&self) -> DashboardViewState {
        self.state_rx.borrow().clone()
    }

    /// Issue an extra cycle now. The regular cadence is unaffected.
    pub fn refresh_now(&self) {
        if self.commands.send(Command::RefreshNow).is_err() {
            debug!("refresh ignored; polling has stopped");
        }
    }

    /// Stop polling and wait for the loop to exit. No state change is
    /// published after this returns.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(error) = task.await
        {
            warn!(%error, "polling task ended abnormally");
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use healthdeck_api::{HealthError, UnreachableCause};
    use healthdeck_types::{HealthStatus, ServiceStats};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Instant, sleep};

    #[derive(Clone, Copy)]
    struct Step {
        delay: Duration,
        online: Option<u64>,
    }

    fn ok(online: u64) -> Step {
        Step {
            delay: Duration::ZERO,
            online: Some(online),
        }
    }

    fn fail() -> Step {
        Step {
            delay: Duration::ZERO,
            online: None,
        }
    }

    fn slow(delay_ms: u64, step: Step) -> Step {
        Step {
            delay: Duration::from_millis(delay_ms),
            ..step
        }
    }

    fn report(online: u64) -> HealthStatus {
        HealthStatus {
            overall_status: Some("ok".into()),
            stats: Some(ServiceStats {
                online_count: Some(online),
                queue_count: Some(0),
            }),
            ..HealthStatus::default()
        }
    }

    /// Plays back a fixed list of steps, then succeeds with 99 forever.
    struct ScriptedSource {
        steps: Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HealthSource for ScriptedSource {
        async fn fetch(&self) -> Result<HealthStatus, HealthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.steps.lock().expect("script lock").pop_front().unwrap_or(ok(99));
            sleep(step.delay).await;
            match step.online {
                Some(online) => Ok(report(online)),
                None => Err(HealthError::Unreachable(UnreachableCause::Incomplete(vec!["status"]))),
            }
        }
    }

    fn start(source: &Arc<ScriptedSource>, overlap_policy: OverlapPolicy) -> PollingHandle {
        let settings = PollerSettings {
            interval: Duration::from_secs(5),
            overlap_policy,
        };
        PollingController::from_shared(Arc::clone(source), settings).start()
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_happens_immediately() {
        let source = ScriptedSource::new(vec![ok(5)]);
        let began = Instant::now();
        let handle = start(&source, OverlapPolicy::DiscardStale);
        let mut updates = handle.subscribe();

        updates.changed().await.expect("first update");
        let state = updates.borrow().clone();
        assert!(began.elapsed() < Duration::from_secs(1));
        assert!(!state.is_loading);
        assert_eq!(state.last_good_payload, Some(report(5)));
        assert_eq!(state.last_applied_cycle, 1);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_on_fixed_cadence() {
        let source = ScriptedSource::new(vec![]);
        let handle = start(&source, OverlapPolicy::DiscardStale);

        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(source.calls(), 3);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(source.calls(), 4);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_payload() {
        let source = ScriptedSource::new(vec![ok(5), fail()]);
        let handle = start(&source, OverlapPolicy::DiscardStale);

        sleep(Duration::from_secs(6)).await;
        let state = handle.snapshot();
        assert_eq!(state.last_good_payload, Some(report(5)));
        assert_eq!(state.connection_error.as_deref(), Some("Cannot connect to service"));
        assert_eq!(state.consecutive_failures, 1);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_error() {
        let source = ScriptedSource::new(vec![fail(), ok(3)]);
        let handle = start(&source, OverlapPolicy::DiscardStale);

        sleep(Duration::from_secs(1)).await;
        let state = handle.snapshot();
        assert!(!state.is_loading);
        assert!(state.last_good_payload.is_none());
        assert!(state.connection_error.is_some());

        sleep(Duration::from_secs(5)).await;
        let state = handle.snapshot();
        assert!(state.connection_error.is_none());
        assert_eq!(state.last_good_payload, Some(report(3)));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_response_does_not_block_next_tick() {
        let source = ScriptedSource::new(vec![slow(12_000, ok(1))]);
        let handle = start(&source, OverlapPolicy::DiscardStale);

        sleep(Duration::from_millis(5_500)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(handle.snapshot().last_good_payload, Some(report(99)));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_from_older_cycle_is_discarded() {
        let source = ScriptedSource::new(vec![slow(7_000, ok(1)), ok(2)]);
        let handle = start(&source, OverlapPolicy::DiscardStale);

        sleep(Duration::from_secs(8)).await;
        let state = handle.snapshot();
        assert_eq!(state.last_good_payload, Some(report(2)));
        assert_eq!(state.last_applied_cycle, 2);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_applies_when_last_completion_wins() {
        let source = ScriptedSource::new(vec![slow(7_000, ok(1)), ok(2)]);
        let handle = start(&source, OverlapPolicy::LastCompletionWins);

        sleep(Duration::from_secs(8)).await;
        assert_eq!(handle.snapshot().last_good_payload, Some(report(1)));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_discards_in_flight_results() {
        let source = ScriptedSource::new(vec![slow(2_000, ok(1))]);
        let handle = start(&source, OverlapPolicy::DiscardStale);
        let updates = handle.subscribe();

        sleep(Duration::from_secs(1)).await;
        handle.stop().await;
        sleep(Duration::from_secs(12)).await;

        assert_eq!(source.calls(), 1);
        let state = updates.borrow().clone();
        assert!(state.is_loading);
        assert!(state.last_good_payload.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_now_runs_an_extra_cycle() {
        let source = ScriptedSource::new(vec![ok(1), ok(2)]);
        let handle = start(&source, OverlapPolicy::DiscardStale);
        let mut updates = handle.subscribe();
        updates.changed().await.expect("first update");

        handle.refresh_now();
        updates.changed().await.expect("refresh update");
        assert_eq!(source.calls(), 2);
        assert_eq!(updates.borrow().last_good_payload, Some(report(2)));
        assert_eq!(updates.borrow().last_applied_cycle, 2);

        // The regular tick still lands at five seconds.
        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(source.calls(), 3);
        handle.stop().await;
    }
}
