use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::theme::ResolvedTheme;
use crate::time::format_relative;

/// Polls older than this are shown in the normal foreground instead of dimmed.
const STALE_AFTER_SECS: i64 = 120;

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(error)
        .style(theme.error_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

/// Render a line with a right-aligned "updated Xm ago" for the last good poll.
pub fn render_with_timestamp(
    frame: &mut Frame,
    content_line: Line,
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    theme: &ResolvedTheme,
    area: Rect,
) {
    let Some(updated_at) = updated_at else {
        frame.render_widget(Paragraph::new(content_line), area);
        return;
    };
    let age_text = format!("updated {}", format_relative(updated_at, now));
    let is_stale = (now - updated_at).num_seconds() >= STALE_AFTER_SECS;
    let style = if is_stale {
        Style::default().fg(theme.foreground)
    } else {
        theme.dim_style()
    };
    let timestamp_span = Span::styled(age_text, style);
    let timestamp_width = timestamp_span.width() as u16;
    let chunks =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(timestamp_width)]).split(area);
    frame.render_widget(Paragraph::new(content_line), chunks[0]);
    frame.render_widget(Paragraph::new(Line::from(timestamp_span)), chunks[1]);
}
