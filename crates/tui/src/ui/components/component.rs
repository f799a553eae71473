//! Component abstraction for the dashboard.
//!
//! Each panel on screen is a component: it renders itself into a `Rect`
//! from the shared [`App`] and may translate key presses into [`Effect`]s
//! that the runtime executes.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::app::{App, Effect};

pub(crate) trait Component {
    /// Handle a key press while this component is active.
    ///
    /// Components never mutate the poller or preferences directly; they
    /// report the desired side effect instead.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw into `rect`. Rendering must not change application state.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App);
}
