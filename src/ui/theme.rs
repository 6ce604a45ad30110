use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub keyword: String,
    pub keyword_bg: String,
    pub input: String,
    pub cursor_bg: String,
    pub correct: String,
    pub incorrect: String,
    pub hint: String,
    pub key_bg: String,
    pub key_fg: String,
    pub key_selected_bg: String,
    pub key_selected_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes override bundled ones of the same name
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("simeq")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => {
                        tracing::warn!(path = %user_theme_path.display(), %err, "ignoring bad user theme")
                    }
                }
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("harbour-night").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1b2430".to_string(),
            fg: "#d8dee9".to_string(),
            muted: "#6b7a8f".to_string(),
            accent: "#88c0d0".to_string(),
            accent_dim: "#3b4a5c".to_string(),
            border: "#3b4a5c".to_string(),
            border_focused: "#88c0d0".to_string(),
            header_bg: "#253241".to_string(),
            header_fg: "#eceff4".to_string(),
            keyword: "#ebcb8b".to_string(),
            keyword_bg: "#2e3b4d".to_string(),
            input: "#eceff4".to_string(),
            cursor_bg: "#4c6a88".to_string(),
            correct: "#a3be8c".to_string(),
            incorrect: "#bf616a".to_string(),
            hint: "#b48ead".to_string(),
            key_bg: "#2e3b4d".to_string(),
            key_fg: "#d8dee9".to_string(),
            key_selected_bg: "#88c0d0".to_string(),
            key_selected_fg: "#1b2430".to_string(),
            bar_filled: "#88c0d0".to_string(),
            bar_empty: "#253241".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn keyword(&self) -> Color { Self::parse_color(&self.keyword) }
    pub fn keyword_bg(&self) -> Color { Self::parse_color(&self.keyword_bg) }
    pub fn input(&self) -> Color { Self::parse_color(&self.input) }
    pub fn cursor_bg(&self) -> Color { Self::parse_color(&self.cursor_bg) }
    pub fn correct(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn incorrect(&self) -> Color { Self::parse_color(&self.incorrect) }
    pub fn hint(&self) -> Color { Self::parse_color(&self.hint) }
    pub fn key_bg(&self) -> Color { Self::parse_color(&self.key_bg) }
    pub fn key_fg(&self) -> Color { Self::parse_color(&self.key_fg) }
    pub fn key_selected_bg(&self) -> Color { Self::parse_color(&self.key_selected_bg) }
    pub fn key_selected_fg(&self) -> Color { Self::parse_color(&self.key_selected_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#88c0d0"), Color::Rgb(0x88, 0xc0, 0xd0));
        assert_eq!(ThemeColors::parse_color("a3be8c"), Color::Rgb(0xa3, 0xbe, 0x8c));
        assert_eq!(ThemeColors::parse_color("#fff"), Color::White);
        assert_eq!(ThemeColors::parse_color("#zzzzzz"), Color::White);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"harbour-night".to_string()));
        for name in names {
            let theme = Theme::load(&name);
            assert!(theme.is_some(), "theme {name} failed to parse");
        }
    }
}
