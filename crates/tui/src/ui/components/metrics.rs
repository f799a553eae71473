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
use crate::view_model::MetricCard;

/// One of the four figure cards. Holds the index of the card it shows.
#[derive(Debug)]
pub(crate) struct MetricCardComponent {
    index: usize,
}

impl MetricCardComponent {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Component for MetricCardComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let Some(card) = app.view.cards.get(self.index) else {
            return;
        };
        let theme = app.theme.theme.as_ref();
        let MetricCard { title, value, subtext } = card;

        let lines = vec![
            Line::from(Span::styled(
                value.as_str(),
                theme.text_primary_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(subtext.as_str(), theme.text_muted_style())),
        ];
        let paragraph = Paragraph::new(lines).block(th::block(theme, Some(*title), false));
        frame.render_widget(paragraph, rect);
    }
}
