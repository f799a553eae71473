use healthdeck_types::Indicator;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard bordered panel with theme surfaces.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .padding(Padding::horizontal(1))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Root background behind every panel.
pub fn background_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { background, text, .. } = *theme.roles();
    Style::default().bg(background).fg(text)
}

/// Green for on, red for off.
pub fn indicator_style<T: Theme + ?Sized>(theme: &T, indicator: Indicator) -> Style {
    if indicator.is_on() {
        theme.status_success().add_modifier(Modifier::BOLD)
    } else {
        theme.status_error().add_modifier(Modifier::BOLD)
    }
}

pub fn indicator_symbol(indicator: Indicator) -> &'static str {
    if indicator.is_on() { "●" } else { "○" }
}
