//! Runtime: terminal lifecycle and the event loop.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Merge three event sources in one `tokio::select!` loop: terminal input,
//!   state snapshots from the poller, and Ctrl+C.
//! - Route keys to the dashboard screen and execute the returned `Effect`s.
//! - Redraw only when something visible changed.
//!
//! Input comes from a dedicated OS thread that owns `crossterm::event::poll`
//! and `read` and forwards events over a channel. The poller runs on its own
//! task; the loop only observes its watch channel, so a slow health check
//! never stalls input handling.
use std::io::Stdout;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use healthdeck_engine::{DashboardViewState, PollingHandle};
use healthdeck_util::UserPreferences;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::{mpsc, watch},
};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, Msg, SessionInfo};
use crate::ui::components::Component;
use crate::ui::main_component::DashboardScreen;
use crate::ui::theme::LoadedTheme;

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn a thread that blocks on terminal input and forwards events.
///
/// The thread exits once the receiving side is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    thread::spawn(move || {
        while !sender.is_closed() {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "failed to poll terminal input");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal input");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<DashboardTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut DashboardTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut DashboardTerminal, app: &App, screen: &mut DashboardScreen) -> Result<()> {
    terminal.draw(|frame| screen.render(frame, frame.area(), app))?;
    Ok(())
}

fn snapshot(updates: &mut watch::Receiver<DashboardViewState>) -> Msg {
    Msg::StateChanged(Box::new(updates.borrow_and_update().clone()))
}

/// Entry point for the dashboard: sets up the terminal, runs the event loop
/// until the user quits, then stops the poller and restores the terminal.
pub async fn run_app(
    poller: PollingHandle,
    session: SessionInfo,
    theme: LoadedTheme,
    preferences: Arc<UserPreferences>,
) -> Result<()> {
    let mut app = App::new(session, theme, preferences);
    let mut screen = DashboardScreen::default();
    let mut terminal = setup_terminal()?;

    let outcome = event_loop(&mut terminal, &mut app, &mut screen, &poller).await;

    poller.stop().await;
    let cleanup = cleanup_terminal(&mut terminal);
    outcome.and(cleanup)
}

async fn event_loop(
    terminal: &mut DashboardTerminal,
    app: &mut App,
    screen: &mut DashboardScreen,
    poller: &PollingHandle,
) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut updates = poller.subscribe();

    app.update(snapshot(&mut updates));
    if let Ok((width, height)) = crossterm::terminal::size() {
        app.update(Msg::Resize(width, height));
    }
    render(terminal, app, screen)?;
    info!(base_url = %app.session.base_url, "dashboard started");

    loop {
        let mut effects = Vec::new();
        let mut needs_render = tokio::select! {
            maybe_event = input_receiver.recv() => match maybe_event {
                Some(Event::Key(key)) => {
                    effects.extend(screen.handle_key_events(app, key));
                    true
                }
                Some(Event::Resize(width, height)) => app.update(Msg::Resize(width, height)),
                Some(_) => false,
                None => {
                    debug!("input channel closed");
                    break;
                }
            },
            changed = updates.changed() => match changed {
                Ok(()) => app.update(snapshot(&mut updates)),
                Err(_) => {
                    warn!("poller stopped unexpectedly");
                    break;
                }
            },
            _ = signal::ctrl_c() => break,
        };

        for effect in effects {
            match effect {
                Effect::Quit => {
                    info!("dashboard closed by user");
                    return Ok(());
                }
                Effect::RefreshNow => poller.refresh_now(),
                Effect::CycleTheme => {
                    app.cycle_theme();
                    needs_render = true;
                }
            }
        }

        if needs_render {
            render(terminal, app, screen)?;
        }
    }

    Ok(())
}
