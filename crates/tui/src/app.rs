//! Application state for the dashboard screen.
//!
//! `App` holds the view derived from the poller's latest snapshot, the
//! active theme and the terminal size. Components read from it during
//! rendering and report what they want done as [`Effect`]s.

use std::sync::Arc;
use std::time::Duration;

use healthdeck_engine::DashboardViewState;
use healthdeck_util::UserPreferences;
use tracing::{info, warn};

use crate::ui::theme::{LoadedTheme, catalog};
use crate::view_model::DashboardView;

/// Messages delivered to the application by the runtime.
#[derive(Debug, Clone)]
pub(crate) enum Msg {
    /// The poller published a new snapshot.
    StateChanged(Box<DashboardViewState>),
    Resize(u16, u16),
}

/// Side effects requested by components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    Quit,
    RefreshNow,
    CycleTheme,
}

/// Static details about the session shown in the header and hint bar.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub base_url: String,
    pub poll_interval: Duration,
}

pub(crate) struct App {
    pub view: DashboardView,
    pub theme: LoadedTheme,
    pub session: SessionInfo,
    /// Last known terminal size, used to pick the compact layout.
    pub size: (u16, u16),
    truecolor: bool,
    preferences: Arc<UserPreferences>,
}

impl App {
    pub fn new(session: SessionInfo, theme: LoadedTheme, preferences: Arc<UserPreferences>) -> Self {
        Self {
            view: DashboardView::from_state(&DashboardViewState::default()),
            truecolor: !theme.definition.is_ansi_fallback,
            theme,
            session,
            size: (0, 0),
            preferences,
        }
    }

    /// Apply a runtime message. Returns `true` when a redraw is needed.
    pub fn update(&mut self, msg: Msg) -> bool {
        match msg {
            Msg::StateChanged(state) => {
                self.view = DashboardView::from_state(&state);
                true
            }
            Msg::Resize(width, height) => {
                let changed = self.size != (width, height);
                self.size = (width, height);
                changed
            }
        }
    }

    /// Switch to the next palette and remember it for future sessions.
    pub fn cycle_theme(&mut self) {
        let next = catalog::next_after(self.theme.definition, self.truecolor);
        if next.id == self.theme.definition.id {
            return;
        }
        self.theme = LoadedTheme::from_definition(next);
        info!(theme = next.id, "theme changed");
        if let Err(error) = self.preferences.set_preferred_theme(Some(next.id.to_string())) {
            warn!(%error, "failed to persist theme preference");
        }
    }
}
