use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::app::App;
use crate::ui::theme::theme_helpers as th;

/// Title on the left; connection state, refresh time and server time on the right.
#[derive(Debug, Default)]
pub(crate) struct HeaderComponent;

impl Component for HeaderComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App) {
        let theme = app.theme.theme.as_ref();
        let block = th::block(theme, None, false);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [left, right] = Layout::horizontal([Constraint::Min(20), Constraint::Length(46)]).areas(inner);

        let title = vec![
            Line::from(Span::styled("Healthdeck", theme.accent_emphasis_style())),
            Line::from(vec![
                Span::styled("Real-time service monitoring  ", theme.text_muted_style()),
                Span::styled(app.session.base_url.as_str(), theme.text_secondary_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(title), left);

        let connection = &app.view.connection;
        let mut headline = vec![
            Span::styled(th::indicator_symbol(connection.indicator), th::indicator_style(theme, connection.indicator)),
            Span::raw(" "),
            Span::styled(connection.label, theme.text_primary_style().add_modifier(Modifier::BOLD)),
        ];
        if connection.consecutive_failures > 1 {
            headline.push(Span::styled(
                format!("  ({} failed)", connection.consecutive_failures),
                theme.status_warning(),
            ));
        }
        let mut status = vec![Line::from(headline)];

        let updated = connection.last_updated.as_deref().unwrap_or("--:--:--");
        let mut detail = vec![Span::styled(format!("Last updated: {updated}"), theme.text_muted_style())];
        if let Some(server_time) = &connection.server_time {
            detail.push(Span::styled(format!("  Server time: {server_time}"), theme.text_muted_style()));
        }
        status.push(Line::from(detail));
        frame.render_widget(Paragraph::new(status).alignment(Alignment::Right), right);
    }
}
