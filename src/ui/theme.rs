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
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub display_bg: String,
    pub key_digit: String,
    pub key_operator: String,
    pub key_function: String,
    pub key_danger: String,
    pub key_equals: String,
    pub ai: String,
    pub error: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("kalkulacka")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => {
                        tracing::warn!(path = %user_theme_path.display(), error = %err, "ignoring invalid user theme");
                    }
                }
            }
        }

        // Try bundled themes
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
        Self::load("slate").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#020617".to_string(),
            fg: "#e2e8f0".to_string(),
            muted: "#64748b".to_string(),
            accent: "#6366f1".to_string(),
            border: "#1e293b".to_string(),
            border_focused: "#6366f1".to_string(),
            header_bg: "#0f172a".to_string(),
            header_fg: "#f8fafc".to_string(),
            display_bg: "#0b1120".to_string(),
            key_digit: "#e2e8f0".to_string(),
            key_operator: "#818cf8".to_string(),
            key_function: "#94a3b8".to_string(),
            key_danger: "#f87171".to_string(),
            key_equals: "#a5b4fc".to_string(),
            ai: "#818cf8".to_string(),
            error: "#f87171".to_string(),
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
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn display_bg(&self) -> Color { Self::parse_color(&self.display_bg) }
    pub fn key_digit(&self) -> Color { Self::parse_color(&self.key_digit) }
    pub fn key_operator(&self) -> Color { Self::parse_color(&self.key_operator) }
    pub fn key_function(&self) -> Color { Self::parse_color(&self.key_function) }
    pub fn key_danger(&self) -> Color { Self::parse_color(&self.key_danger) }
    pub fn key_equals(&self) -> Color { Self::parse_color(&self.key_equals) }
    pub fn ai(&self) -> Color { Self::parse_color(&self.ai) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
}
