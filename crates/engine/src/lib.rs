//! # Healthdeck Engine
//!
//! Drives the periodic health check behind the dashboard and owns the state
//! the render layer reads.
//!
//! ## Architecture
//!
//! - **`source`**: the [`HealthSource`] seam between the poller and the HTTP client
//! - **`state`**: [`DashboardViewState`] and the rules for folding one poll outcome into it
//! - **`controller`**: [`PollingController`], a background task that fetches on a fixed
//!   cadence and publishes state snapshots over a `tokio::sync::watch` channel
//!
//! ## Usage
//!
//! ```ignore
//! use healthdeck_api::{HealthClient, HealthClientOptions};
//! use healthdeck_engine::{PollerSettings, PollingController};
//!
//! async fn run() -> anyhow::Result<()> {
//!     let client = HealthClient::new("http://localhost:8080", HealthClientOptions::default())?;
//!     let handle = PollingController::new(client, PollerSettings::default()).start();
//!     let mut updates = handle.subscribe();
//!     updates.changed().await?;
//!     println!("{:?}", updates.borrow().connection_error);
//!     handle.stop().await;
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod source;
pub mod state;

pub use controller::{PollerSettings, PollingController, PollingHandle};
pub use source::HealthSource;
pub use state::{CycleOutcome, DashboardViewState};
