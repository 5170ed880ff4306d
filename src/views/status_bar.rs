use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::ResolvedTheme;

/// Builder for the one-line status bar under the feed.
///
/// Layout: `[Label] [Loading?] [Error?] Position | Help Text`
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    loading_text: Option<&'a str>,
    error_text: Option<&'a str>,
    position: Option<(usize, usize)>,
    help_text: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme) -> Self {
        Self {
            theme,
            label: "",
            loading_text: None,
            error_text: None,
            position: None,
            help_text: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.loading_text = Some(text);
        self
    }

    /// Last poll failure; entries on screen are from an older poll.
    pub fn error(mut self, text: &'a str) -> Self {
        self.error_text = Some(text);
        self
    }

    pub fn position(mut self, current: usize, total: usize) -> Self {
        self.position = Some((current, total));
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        self.help_text = text;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), self.theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading.to_string(), self.theme.spinner_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some(error) = self.error_text {
            spans.push(Span::styled(error.to_string(), self.theme.error_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some((current, total)) = self.position {
            spans.push(Span::styled(
                format!("{}/{}", current, total),
                self.theme.dim_style(),
            ));
            spans.push(Span::raw(" | "));
        }

        spans.push(Span::styled(
            self.help_text.to_string(),
            Style::default().fg(self.theme.foreground_dim),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ThemeVariant, default_for_variant};
    use crate::views::tests::render_to_string;

    #[test]
    fn test_status_bar_full() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let output = render_to_string(60, 1, |frame| {
            StatusBar::new(&theme)
                .label("Home")
                .position(5, 30)
                .help("l:like  ?:help")
                .render(frame, frame.area());
        });

        assert!(output.contains("Home"));
        assert!(output.contains("5/30"));
        assert!(output.contains("l:like"));
    }

    #[test]
    fn test_status_bar_with_loading_and_error() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let output = render_to_string(80, 1, |frame| {
            StatusBar::new(&theme)
                .label("Home")
                .loading("⠋ Polling")
                .error("Server busy, try later.")
                .help("?:help")
                .render(frame, frame.area());
        });

        assert!(output.contains("Polling"));
        assert!(output.contains("Server busy"));
    }

    #[test]
    fn test_status_bar_minimal() {
        let theme = default_for_variant(ThemeVariant::Dark);
        let output = render_to_string(40, 1, |frame| {
            StatusBar::new(&theme)
                .label("Feed")
                .help("q:quit")
                .render(frame, frame.area());
        });

        assert!(output.contains("Feed"));
        assert!(output.contains("q:quit"));
        assert!(!output.contains('/'));
    }
}
