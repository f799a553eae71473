//! # Healthdeck TUI
//!
//! Terminal dashboard for a service's `/health` endpoint, built on ratatui.
//!
//! ## Architecture
//!
//! - [`view_model`]: pure mapping from the poller's state to display values,
//!   shared with the plain-text `status` output
//! - `app`: application state, messages and effects
//! - `ui`: components, layout, themes and the event loop
//!
//! The poller itself lives in `healthdeck-engine`; this crate only observes
//! its watch channel and asks for out-of-band refreshes.

mod app;
mod ui;
pub mod view_model;

use std::sync::Arc;

use anyhow::Result;
use healthdeck_engine::PollingHandle;
use healthdeck_util::UserPreferences;

pub use app::SessionInfo;
pub use ui::theme::{LoadedTheme, ThemeDefinition, load as load_theme};
pub use view_model::DashboardView;

/// Run the interactive dashboard until the user quits.
///
/// Takes ownership of the poller and stops it before returning.
///
/// # Errors
///
/// Terminal setup or drawing failures.
pub async fn run(poller: PollingHandle, session: SessionInfo, theme: LoadedTheme, preferences: Arc<UserPreferences>) -> Result<()> {
    ui::runtime::run_app(poller, session, theme, preferences).await
}
