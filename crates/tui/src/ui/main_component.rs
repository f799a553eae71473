//! Top-level dashboard screen.
//!
//! Owns the panel components, routes key presses to effects, and lays the
//! panels out for the current terminal size.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};

use super::components::{
    BannerComponent, Component, FeaturesComponent, HeaderComponent, HintBarComponent, InfrastructureComponent, MetricCardComponent,
};
use super::layout::DashboardLayout;
use super::theme::theme_helpers as th;
use super::utils::centered_rect;
use crate::app::{App, Effect};

/// Below this size the panels cannot be drawn legibly.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

#[derive(Debug)]
pub(crate) struct DashboardScreen {
    header: HeaderComponent,
    cards: [MetricCardComponent; 4],
    infrastructure: InfrastructureComponent,
    features: FeaturesComponent,
    banner: BannerComponent,
    hints: HintBarComponent,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self {
            header: HeaderComponent,
            cards: std::array::from_fn(MetricCardComponent::new),
            infrastructure: InfrastructureComponent,
            features: FeaturesComponent,
            banner: BannerComponent,
            hints: HintBarComponent,
        }
    }
}

impl Component for DashboardScreen {
    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![Effect::Quit],
            KeyCode::Char('q') | KeyCode::Esc => vec![Effect::Quit],
            KeyCode::Char('r') => vec![Effect::RefreshNow],
            KeyCode::Char('t') => vec![Effect::CycleTheme],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let theme = app.theme.theme.as_ref();
        frame.render_widget(Block::default().style(th::background_style(theme)), rect);

        if rect.width < MIN_WIDTH || rect.height < MIN_HEIGHT {
            let notice = Paragraph::new(format!("{}\nEnlarge the terminal to see the dashboard.", app.view.connection.label))
                .style(theme.text_secondary_style())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(notice, centered_rect(90, 60, rect));
            return;
        }

        let areas = DashboardLayout::responsive_layout(rect);
        self.header.render(frame, areas.header, app);
        for (card, area) in self.cards.iter_mut().zip(areas.cards) {
            card.render(frame, area, app);
        }
        self.infrastructure.render(frame, areas.infrastructure, app);
        self.features.render(frame, areas.features, app);
        self.hints.render(frame, areas.hints, app);
        self.banner.render(frame, rect, app);
    }
}
