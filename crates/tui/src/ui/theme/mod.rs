//! Theme styling for the dashboard.
//!
//! Defines the Dracula and Nord palettes, an ANSI 256-color fallback,
//! semantic theme roles, and helper builders for ratatui widgets. Prefer
//! these helpers over hard-coded colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use catalog::ThemeDefinition;
pub use dracula::{DraculaTheme, DraculaThemeHighContrast};
pub use nord::NordTheme;
pub use roles::Theme;

/// Theme plus the definition it was built from.
#[derive(Debug)]
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    pub fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Select a theme from the configured name and the terminal's color support.
///
/// Unknown names fall back to the default palette for the terminal.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    if !supports_truecolor() {
        debug!("ANSI-only terminal detected; forcing fallback palette");
        return LoadedTheme::from_definition(catalog::default_ansi());
    }

    if let Some(name) = preferred_theme {
        match catalog::resolve(name) {
            Some(definition) => return LoadedTheme::from_definition(definition),
            None => debug!(theme = name, "unknown theme; using default"),
        }
    }

    LoadedTheme::from_definition(catalog::default_truecolor())
}

/// Returns `true` when the current terminal can show the truecolor palettes.
pub fn supports_truecolor() -> bool {
    matches!(detect_color_capability(), ColorCapability::Truecolor)
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_terminal_forces_fallback() {
        temp_env::with_var("TUI_COLOR_MODE", Some("ansi256"), || {
            assert_eq!(load(Some("nord")).definition.id, "ansi256");
        });
    }

    #[test]
    fn truecolor_terminal_honours_preference() {
        temp_env::with_var("TUI_COLOR_MODE", Some("truecolor"), || {
            assert_eq!(load(Some("nord")).definition.id, "nord");
            assert_eq!(load(Some("unknown")).definition.id, "dracula");
            assert_eq!(load(None).definition.id, "dracula");
        });
    }
}
