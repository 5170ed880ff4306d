mod builtin;
mod detect;

pub use builtin::{all_themes, by_name, default_for_variant};
pub use detect::detect_terminal_theme;

use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Picks the theme for a configured choice: `dark`, `light`, or a built-in
/// theme name. With no choice the terminal background decides.
pub fn resolve(choice: Option<&str>) -> Result<ResolvedTheme> {
    match choice {
        None => Ok(default_for_variant(detect_terminal_theme())),
        Some("dark") => Ok(default_for_variant(ThemeVariant::Dark)),
        Some("light") => Ok(default_for_variant(ThemeVariant::Light)),
        Some(name) => by_name(name).map(ResolvedTheme::from).with_context(|| {
            format!("Theme '{name}' not found. Use 'ffeed theme list' to see available themes.")
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub meta: ThemeMeta,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeMeta {
    pub description: Option<String>,
    #[serde(default)]
    pub variant: ThemeVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    Named(String),
    Hex(String),
    Rgb { r: u8, g: u8, b: u8 },
    Indexed(u8),
}

impl ThemeColor {
    pub fn to_color(&self) -> Color {
        match self {
            ThemeColor::Named(name) => Self::parse_named(name),
            ThemeColor::Hex(hex) => Self::parse_hex(hex),
            ThemeColor::Rgb { r, g, b } => Color::Rgb(*r, *g, *b),
            ThemeColor::Indexed(idx) => Color::Indexed(*idx),
        }
    }

    fn parse_named(name: &str) -> Color {
        if name.starts_with('#') {
            return Self::parse_hex(name);
        }
        match name.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "darkgray" | "darkgrey" | "dark_gray" => Color::DarkGray,
            "lightblue" | "light_blue" => Color::LightBlue,
            "lightcyan" | "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => Color::Reset,
        }
    }

    fn parse_hex(hex: &str) -> Color {
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
        Color::Reset
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub foreground: ThemeColor,
    pub foreground_dim: ThemeColor,
    pub border: ThemeColor,
    pub selection_bg: ThemeColor,
    pub primary: ThemeColor,
    pub error: ThemeColor,
    pub author: ThemeColor,
    /// Clickable affordances: Like, Comment, placeholders.
    pub action: ThemeColor,
    pub like: ThemeColor,
    pub comment_text: ThemeColor,
    pub status_bar_bg: ThemeColor,
    pub status_bar_fg: ThemeColor,
    pub spinner: ThemeColor,
}

#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub name: String,
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub primary: Color,
    pub error: Color,
    pub author: Color,
    pub action: Color,
    pub like: Color,
    pub comment_text: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl ResolvedTheme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn author_style(&self) -> Style {
        Style::default()
            .fg(self.author)
            .add_modifier(Modifier::BOLD)
    }

    pub fn action_style(&self) -> Style {
        Style::default()
            .fg(self.action)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn like_style(&self) -> Style {
        Style::default().fg(self.like)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    pub fn comment_text_style(&self) -> Style {
        Style::default().fg(self.comment_text)
    }
}

impl From<Theme> for ResolvedTheme {
    fn from(theme: Theme) -> Self {
        let c = theme.colors;
        ResolvedTheme {
            name: theme.name,
            variant: theme.meta.variant,
            foreground: c.foreground.to_color(),
            foreground_dim: c.foreground_dim.to_color(),
            border: c.border.to_color(),
            selection_bg: c.selection_bg.to_color(),
            primary: c.primary.to_color(),
            error: c.error.to_color(),
            author: c.author.to_color(),
            action: c.action.to_color(),
            like: c.like.to_color(),
            comment_text: c.comment_text.to_color(),
            status_bar_bg: c.status_bar_bg.to_color(),
            status_bar_fg: c.status_bar_fg.to_color(),
            spinner: c.spinner.to_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        assert_eq!(
            ThemeColor::Hex("#FF8000".to_string()).to_color(),
            Color::Rgb(255, 128, 0)
        );
        assert_eq!(
            ThemeColor::Named("Cyan".to_string()).to_color(),
            Color::Cyan
        );
        assert_eq!(ThemeColor::Hex("#abc".to_string()).to_color(), Color::Reset);
        assert_eq!(ThemeColor::Indexed(42).to_color(), Color::Indexed(42));
    }

    #[test]
    fn test_resolve_choices() {
        assert_eq!(resolve(Some("light")).unwrap().name, "default-light");
        assert_eq!(resolve(Some("dark")).unwrap().name, "default-dark");
        assert_eq!(resolve(Some("nord")).unwrap().name, "nord");

        let err = resolve(Some("nope")).unwrap_err().to_string();
        assert!(err.contains("'nope' not found"));
    }

    #[test]
    fn test_theme_from_toml() {
        let toml = r##"
            name = "custom"

            [meta]
            variant = "light"

            [colors]
            foreground = "black"
            foreground_dim = "#777777"
            border = "gray"
            selection_bg = "#EEEEEE"
            primary = "blue"
            error = "red"
            author = "blue"
            action = { r = 0, g = 0, b = 200 }
            like = "magenta"
            comment_text = "black"
            status_bar_bg = "blue"
            status_bar_fg = "white"
            spinner = 208
        "##;
        let theme: Theme = toml::from_str(toml).unwrap();
        let resolved = ResolvedTheme::from(theme);

        assert_eq!(resolved.variant, ThemeVariant::Light);
        assert_eq!(resolved.foreground_dim, Color::Rgb(0x77, 0x77, 0x77));
        assert_eq!(resolved.action, Color::Rgb(0, 0, 200));
        assert_eq!(resolved.spinner, Color::Indexed(208));
    }
}
