//! Screen layout for the dashboard.
//!
//! Wide terminals show the four metric cards in one row and the two status
//! panels side by side. Narrow terminals stack them: cards in a 2x2 grid and
//! panels one above the other.
use ratatui::prelude::*;

/// Terminals at least this wide use the single-row layout.
pub(crate) const WIDE_LAYOUT_MIN_WIDTH: u16 = 100;

const HEADER_HEIGHT: u16 = 4;
const CARD_HEIGHT: u16 = 4;
/// Three status lines plus borders.
const PANEL_HEIGHT: u16 = 5;
const HINT_HEIGHT: u16 = 1;
const BANNER_HEIGHT: u16 = 3;
const BANNER_MIN_WIDTH: u16 = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DashboardAreas {
    pub header: Rect,
    pub cards: [Rect; 4],
    pub infrastructure: Rect,
    pub features: Rect,
    pub hints: Rect,
}

pub(crate) struct DashboardLayout;

impl DashboardLayout {
    pub fn responsive_layout(area: Rect) -> DashboardAreas {
        let wide = area.width >= WIDE_LAYOUT_MIN_WIDTH;
        let (cards_height, panels_height) = if wide {
            (CARD_HEIGHT, PANEL_HEIGHT)
        } else {
            (CARD_HEIGHT * 2, PANEL_HEIGHT * 2)
        };

        let [header, cards_area, panels_area, _gap, hints] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(cards_height),
            Constraint::Length(panels_height),
            Constraint::Min(0),
            Constraint::Length(HINT_HEIGHT),
        ])
        .areas(area);

        let cards = if wide {
            Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(cards_area)
        } else {
            let [top, bottom] = Layout::vertical([Constraint::Length(CARD_HEIGHT); 2]).areas(cards_area);
            let [a, b] = Layout::horizontal([Constraint::Ratio(1, 2); 2]).areas(top);
            let [c, d] = Layout::horizontal([Constraint::Ratio(1, 2); 2]).areas(bottom);
            [a, b, c, d]
        };

        let [infrastructure, features] = if wide {
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(panels_area)
        } else {
            Layout::vertical([Constraint::Length(PANEL_HEIGHT); 2]).areas(panels_area)
        };

        DashboardAreas {
            header,
            cards,
            infrastructure,
            features,
            hints,
        }
    }

    /// Area for the error banner: bottom-right corner, just above the hint bar.
    pub fn banner_area(area: Rect, message_width: u16) -> Rect {
        let width = (message_width + 6).max(BANNER_MIN_WIDTH).min(area.width);
        let height = BANNER_HEIGHT.min(area.height.saturating_sub(HINT_HEIGHT));
        let x = area.x + area.width - width;
        let y = (area.y + area.height).saturating_sub(HINT_HEIGHT + height).max(area.y);
        Rect::new(x, y, width, height)
    }
}
