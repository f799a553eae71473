use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::app::App;
use crate::ui::theme::theme_helpers as th;

const LABEL_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 10;

#[derive(Debug, Default)]
pub(crate) struct InfrastructureComponent;

impl Component for InfrastructureComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let theme = app.theme.theme.as_ref();
        let lines: Vec<Line> = app
            .view
            .infrastructure
            .iter()
            .map(|item| {
                let indicator_style = th::indicator_style(theme, item.indicator);
                Line::from(vec![
                    Span::styled(th::indicator_symbol(item.indicator), indicator_style),
                    Span::raw(" "),
                    Span::styled(format!("{:<LABEL_WIDTH$}", item.label), theme.text_primary_style()),
                    Span::styled(format!("{:<STATUS_WIDTH$}", item.status_text), indicator_style),
                    Span::styled(item.description, theme.text_muted_style()),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(th::block(theme, Some("Infrastructure Status"), false));
        frame.render_widget(paragraph, rect);
    }
}
