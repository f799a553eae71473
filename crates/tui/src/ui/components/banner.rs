use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::Component;
use crate::app::App;
use crate::ui::layout::DashboardLayout;

/// Error overlay shown while the last cycle failed.
#[derive(Debug, Default)]
pub(crate) struct BannerComponent;

impl Component for BannerComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let Some(message) = app.view.banner.as_deref() else {
            return;
        };
        let theme = app.theme.theme.as_ref();
        let text = format!("⚠ {message}");
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let area = DashboardLayout::banner_area(rect, width);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.banner_style())
            .style(theme.banner_style());
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(Line::from(text)).centered().block(block), area);
    }
}
