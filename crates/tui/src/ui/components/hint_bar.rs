//! Single-line strip of key bindings along the bottom edge.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::app::App;

#[derive(Debug, Default)]
pub(crate) struct HintBarComponent;

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let theme = app.theme.theme.as_ref();
        let key = |label: &'static str| Span::styled(label, theme.accent_emphasis_style());
        let text = |label: String| Span::styled(label, theme.text_muted_style());

        let hints = Line::from(vec![
            key("q"),
            text(" quit  ".into()),
            key("r"),
            text(" refresh  ".into()),
            key("t"),
            text(format!(" theme ({})  ", app.theme.definition.label)),
            text(format!("polling every {}s", app.session.poll_interval.as_secs_f64())),
        ]);
        frame.render_widget(Paragraph::new(hints).style(theme.text_muted_style()), rect);
    }
}
