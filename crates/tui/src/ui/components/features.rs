use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::app::App;
use crate::ui::theme::theme_helpers as th;

const LABEL_WIDTH: usize = 16;

#[derive(Debug, Default)]
pub(crate) struct FeaturesComponent;

impl Component for FeaturesComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let theme = app.theme.theme.as_ref();
        let lines: Vec<Line> = app
            .view
            .features
            .iter()
            .map(|flag| {
                Line::from(vec![
                    Span::styled(format!("{:<LABEL_WIDTH$}", flag.label), theme.text_primary_style()),
                    Span::styled(flag.value, theme.status_info().add_modifier(Modifier::BOLD)),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(th::block(theme, Some("Security & Performance"), false));
        frame.render_widget(paragraph, rect);
    }
}
