use super::{ResolvedTheme, Theme, ThemeColor, ThemeColors, ThemeMeta, ThemeVariant};

pub fn all_themes() -> Vec<Theme> {
    vec![default_dark(), default_light(), nord(), solarized_light()]
}

pub fn by_name(name: &str) -> Option<Theme> {
    all_themes().into_iter().find(|t| t.name == name)
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => default_dark().into(),
        ThemeVariant::Light => default_light().into(),
    }
}

fn named(s: &str) -> ThemeColor {
    ThemeColor::Named(s.to_string())
}

fn hex(s: &str) -> ThemeColor {
    ThemeColor::Hex(s.to_string())
}

pub fn default_dark() -> Theme {
    Theme {
        name: "default-dark".to_string(),
        meta: ThemeMeta {
            description: Some("Default dark theme using terminal colors".to_string()),
            variant: ThemeVariant::Dark,
        },
        colors: ThemeColors {
            foreground: named("white"),
            foreground_dim: hex("#6A9A9A"),
            border: hex("#6A9A9A"),
            selection_bg: named("darkgray"),
            primary: named("yellow"),
            error: named("red"),
            author: named("cyan"),
            action: named("lightblue"),
            like: named("magenta"),
            comment_text: named("white"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("yellow"),
        },
    }
}

pub fn default_light() -> Theme {
    Theme {
        name: "default-light".to_string(),
        meta: ThemeMeta {
            description: Some("Default light theme using terminal colors".to_string()),
            variant: ThemeVariant::Light,
        },
        colors: ThemeColors {
            foreground: named("black"),
            foreground_dim: named("darkgray"),
            border: named("darkgray"),
            selection_bg: named("lightcyan"),
            primary: named("blue"),
            error: named("red"),
            author: named("blue"),
            action: named("blue"),
            like: named("magenta"),
            comment_text: named("black"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("blue"),
        },
    }
}

pub fn nord() -> Theme {
    Theme {
        name: "nord".to_string(),
        meta: ThemeMeta {
            description: Some("Arctic, bluish color palette".to_string()),
            variant: ThemeVariant::Dark,
        },
        colors: ThemeColors {
            foreground: hex("#ECEFF4"),
            foreground_dim: hex("#4C566A"),
            border: hex("#4C566A"),
            selection_bg: hex("#434C5E"),
            primary: hex("#88C0D0"),
            error: hex("#BF616A"),
            author: hex("#81A1C1"),
            action: hex("#88C0D0"),
            like: hex("#B48EAD"),
            comment_text: hex("#D8DEE9"),
            status_bar_bg: hex("#5E81AC"),
            status_bar_fg: hex("#ECEFF4"),
            spinner: hex("#EBCB8B"),
        },
    }
}

pub fn solarized_light() -> Theme {
    Theme {
        name: "solarized-light".to_string(),
        meta: ThemeMeta {
            description: Some("Solarized light".to_string()),
            variant: ThemeVariant::Light,
        },
        colors: ThemeColors {
            foreground: hex("#586E75"),
            foreground_dim: hex("#93A1A1"),
            border: hex("#93A1A1"),
            selection_bg: hex("#EEE8D5"),
            primary: hex("#268BD2"),
            error: hex("#DC322F"),
            author: hex("#268BD2"),
            action: hex("#2AA198"),
            like: hex("#D33682"),
            comment_text: hex("#657B83"),
            status_bar_bg: hex("#268BD2"),
            status_bar_fg: hex("#FDF6E3"),
            spinner: hex("#B58900"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_by_name() {
        assert!(by_name("nord").is_some());
        assert!(by_name("no-such-theme").is_none());
    }

    #[test]
    fn test_theme_names_unique() {
        let themes = all_themes();
        let mut names: Vec<_> = themes.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), themes.len());
    }

    #[test]
    fn test_default_for_variant() {
        let light = default_for_variant(ThemeVariant::Light);
        assert_eq!(light.variant, ThemeVariant::Light);
        assert_eq!(light.foreground, Color::Black);
        assert_eq!(
            default_for_variant(ThemeVariant::Dark).variant,
            ThemeVariant::Dark
        );
    }
}
