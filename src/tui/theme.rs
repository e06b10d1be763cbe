//! Theme definitions for the TUI
//!
//! Colorblind-safe themes for dark and light terminals. The default is
//! "dark"; users can configure "light" via config file or LOBBYMON_THEME.

use ratatui::style::Color;

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeName::Light,
            _ => ThemeName::Dark,
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,

    // Base colors
    pub fg: Color,
    pub border: Color,
    pub border_focused: Color,

    // Occupancy colors
    pub pop_empty: Color,
    pub pop_low: Color,
    pub pop_mid: Color,
    pub pop_full: Color,

    // UI elements
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub accent: Color,
    pub error: Color,
    pub success: Color,
    pub stale_indicator: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a theme from a configured name
    pub fn from_name(name: &str) -> Self {
        match ThemeName::from_str(name) {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Create a dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            fg: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            pop_empty: Color::DarkGray,
            pop_low: Color::Green,
            pop_mid: Color::Yellow,
            pop_full: Color::LightRed,
            selected_bg: Color::DarkGray,
            selected_fg: Color::White,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            accent: Color::Cyan,
            error: Color::LightRed,
            success: Color::Green,
            stale_indicator: Color::Yellow,
        }
    }

    /// Create a light theme
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            fg: Color::Black,
            border: Color::Gray,
            border_focused: Color::Blue,
            pop_empty: Color::Gray,
            pop_low: Color::Green,
            pop_mid: Color::Rgb(180, 120, 0),
            pop_full: Color::Red,
            selected_bg: Color::LightBlue,
            selected_fg: Color::Black,
            header_bg: Color::White,
            header_fg: Color::Blue,
            accent: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            stale_indicator: Color::Rgb(180, 120, 0),
        }
    }

    /// Occupancy color for a players/max ratio
    pub fn population_color(&self, players: u32, max_players: u32) -> Color {
        if max_players == 0 || players == 0 {
            return self.pop_empty;
        }
        let fill = players as f64 / max_players as f64;
        if fill >= 0.9 {
            self.pop_full
        } else if fill >= 0.5 {
            self.pop_mid
        } else {
            self.pop_low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_parsing() {
        assert_eq!(ThemeName::from_str("light"), ThemeName::Light);
        assert_eq!(ThemeName::from_str("Dark"), ThemeName::Dark);
        assert_eq!(ThemeName::from_str("solarized"), ThemeName::Dark);
    }

    #[test]
    fn test_population_color_bands() {
        let theme = Theme::dark();
        assert_eq!(theme.population_color(0, 8), theme.pop_empty);
        assert_eq!(theme.population_color(2, 8), theme.pop_low);
        assert_eq!(theme.population_color(4, 8), theme.pop_mid);
        assert_eq!(theme.population_color(8, 8), theme.pop_full);
        assert_eq!(theme.population_color(3, 0), theme.pop_empty);
    }
}
