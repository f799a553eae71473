use ratatui::style::Color;

use super::{Ansi256Theme, DraculaTheme, DraculaThemeHighContrast, NordTheme, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used for persistence.
    pub id: &'static str,
    /// Human-friendly display name.
    pub label: &'static str,
    /// Representative accent, shown in the hint bar next to the label.
    pub accent: Color,
    /// Alternative spellings accepted from flags, env and preferences.
    pub aliases: &'static [&'static str],
    /// Whether the palette targets ANSI/8-bit terminals.
    pub is_ansi_fallback: bool,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

const DRACULA: ThemeDefinition = ThemeDefinition {
    id: "dracula",
    label: "Dracula",
    accent: Color::Rgb(0xFF, 0x79, 0xC6),
    aliases: &["dracula"],
    is_ansi_fallback: false,
    factory: || Box::new(DraculaTheme::new()),
};

const ANSI256: ThemeDefinition = ThemeDefinition {
    id: "ansi256",
    label: "ANSI 256",
    accent: Color::Indexed(212),
    aliases: &["ansi256", "ansi", "256"],
    is_ansi_fallback: true,
    factory: || Box::new(Ansi256Theme::new()),
};

/// Ordered list of themes; `t` cycles through them in this order.
pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    DRACULA,
    ThemeDefinition {
        id: "dracula_hc",
        label: "Dracula High Contrast",
        accent: Color::Rgb(0xBD, 0x93, 0xF9),
        aliases: &["dracula_hc", "dracula-high-contrast", "dracula-hc", "draculahc"],
        is_ansi_fallback: false,
        factory: || Box::new(DraculaThemeHighContrast::new()),
    },
    ThemeDefinition {
        id: "nord",
        label: "Nord",
        accent: Color::Rgb(0x88, 0xC0, 0xD0),
        aliases: &["nord"],
        is_ansi_fallback: false,
        factory: || Box::new(NordTheme::new()),
    },
    ANSI256,
];

/// Locate a definition by id or alias (case-insensitive).
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    let normalized = name.trim();
    THEME_DEFINITIONS.iter().find(|definition| {
        definition.id.eq_ignore_ascii_case(normalized) || definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(normalized))
    })
}

/// Preferred default for truecolor terminals.
pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

/// Preferred default for ANSI-only terminals.
pub fn default_ansi() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[THEME_DEFINITIONS.len() - 1]
}

/// The definition after `current` in cycling order, wrapping around.
///
/// ANSI-only terminals have a single usable palette, so cycling is a no-op there.
pub fn next_after(current: &ThemeDefinition, truecolor: bool) -> &'static ThemeDefinition {
    if !truecolor {
        return default_ansi();
    }
    let candidates: Vec<&'static ThemeDefinition> = THEME_DEFINITIONS.iter().filter(|definition| !definition.is_ansi_fallback).collect();
    let position = candidates.iter().position(|definition| definition.id == current.id);
    match position {
        Some(index) => candidates[(index + 1) % candidates.len()],
        None => default_truecolor(),
    }
}
