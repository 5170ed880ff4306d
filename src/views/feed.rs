use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::api::{Command, Comment, Like, PAGE_SIZE};
use crate::app::App;
use crate::feed::{EntryViewState, ListField};
use crate::help::{feed_compact_items, form_items, format_items};
use crate::keys::{feed_keymap, form_keymap, global_keymap};
use crate::theme::ResolvedTheme;
use crate::time::format_server_date;
use crate::views::common::{render_error, render_with_timestamp};
use crate::views::html::strip_html;
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

const INDENT: &str = "  ";
const COMMENT_INDENT: &str = "    ";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(0),    // Entry list
        Constraint::Length(1), // Pager
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_entry_list(frame, app, chunks[0]);
    render_pager(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_entry_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if app.store.is_empty() {
        if let Some(err) = &app.poll.error {
            render_error(frame, err, theme, area);
            return;
        }
        let text = if app.poll.is_loading() || app.poll.last_success.is_none() {
            "Loading feed..."
        } else {
            "No entries."
        };
        let widget = Paragraph::new(text).style(theme.dim_style()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        frame.render_widget(widget, area);
        return;
    }

    // Borders plus the highlight symbol
    let width = area.width.saturating_sub(4) as usize;
    let now = app.clock.now();
    let items: Vec<ListItem> = app
        .store
        .iter()
        .enumerate()
        .map(|(i, state)| {
            let selected_comment = if i == app.selected_index {
                app.selected_comment
            } else {
                None
            };
            ListItem::new(entry_lines(state, selected_comment, theme, now, width))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(feed_title(&app.feed_path)),
        )
        .highlight_style(Style::default().bg(theme.selection_bg))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn feed_title(feed_path: &str) -> String {
    let path = feed_path.split('?').next().unwrap_or(feed_path);
    format!(" {} ", path.trim_start_matches('/'))
}

fn entry_lines(
    state: &EntryViewState,
    selected_comment: Option<usize>,
    theme: &ResolvedTheme,
    now: DateTime<Utc>,
    width: usize,
) -> Vec<Line<'static>> {
    let entry = state.entry();
    let mut lines = Vec::new();

    let mut header = vec![Span::styled(entry.from.name.clone(), theme.author_style())];
    if !entry.to.is_empty() {
        let to: Vec<&str> = entry.to.iter().map(|f| f.name.as_str()).collect();
        header.push(Span::styled(" → ", theme.dim_style()));
        header.push(Span::styled(to.join(", "), theme.author_style()));
    }
    lines.push(Line::from(header));

    for row in textwrap::wrap(&strip_html(&entry.body), width.saturating_sub(INDENT.len()).max(1)) {
        lines.push(Line::from(format!("{INDENT}{row}")));
    }

    if !entry.thumbnails.is_empty() {
        let n = entry.thumbnails.len();
        lines.push(Line::styled(
            format!("{INDENT}[{n} image{}]", if n == 1 { "" } else { "s" }),
            theme.dim_style(),
        ));
    }

    lines.push(info_line(state, theme, now));

    if !state.likes().is_empty() {
        lines.push(likes_line(state, theme));
    }

    for (i, comment) in state.comments().iter().enumerate() {
        let highlight = selected_comment == Some(i);
        lines.extend(comment_lines(state, comment, highlight, theme, width));
    }

    let form = state.comment_form();
    if form.open {
        let mut input = vec![
            Span::styled(format!("{INDENT}> "), theme.dim_style()),
            Span::raw(form.draft.clone()),
        ];
        if form.pending.is_some() {
            input.push(Span::styled(" (posting...)", theme.spinner_style()));
        } else {
            input.push(Span::styled("▏", theme.spinner_style()));
        }
        lines.push(Line::from(input));
    }

    lines.push(Line::from(""));
    lines
}

/// Date, source and the actions the viewer may take.
fn info_line(state: &EntryViewState, theme: &ResolvedTheme, now: DateTime<Utc>) -> Line<'static> {
    let entry = state.entry();
    let mut spans = vec![Span::styled(
        format!("{INDENT}{}", format_server_date(&entry.date, now)),
        theme.dim_style(),
    )];
    if let Some(via) = &entry.via {
        spans.push(Span::styled(format!(" via {}", via.name), theme.dim_style()));
    }
    for command in &entry.commands {
        spans.push(Span::styled(" · ", theme.dim_style()));
        spans.push(affordance(*command, theme));
    }
    Line::from(spans)
}

fn affordance(command: Command, theme: &ResolvedTheme) -> Span<'static> {
    match command {
        Command::Comment | Command::Like | Command::Unlike => {
            Span::styled(command.label(), theme.action_style())
        }
        // Shown for completeness; editing and deleting entries happen elsewhere.
        Command::Edit | Command::Delete => Span::styled(command.label(), theme.dim_style()),
    }
}

/// "♥ Al, Bo and 3 other people liked this"
fn likes_line(state: &EntryViewState, theme: &ResolvedTheme) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("{INDENT}♥ "), theme.like_style())];
    let count = state.likes().len();
    for (i, like) in state.likes().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(if i == count - 1 { " and " } else { ", " }));
        }
        spans.push(match like {
            Like::Realized { from, .. } => Span::styled(from.name.clone(), theme.like_style()),
            Like::Placeholder { body, .. } => Span::styled(body.clone(), theme.action_style()),
        });
    }
    spans.push(Span::raw(" liked this"));
    if state.is_expanding(ListField::Likes) {
        spans.push(Span::styled(" (loading...)", theme.spinner_style()));
    }
    Line::from(spans)
}

fn comment_lines(
    state: &EntryViewState,
    comment: &Comment,
    highlight: bool,
    theme: &ResolvedTheme,
    width: usize,
) -> Vec<Line<'static>> {
    let extra = if highlight {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    match comment {
        Comment::Realized(c) => {
            let wrap_width = width.saturating_sub(COMMENT_INDENT.len()).max(1);
            let mut rows: Vec<String> = textwrap::wrap(&strip_html(&c.body), wrap_width)
                .into_iter()
                .map(|row| row.into_owned())
                .collect();
            if rows.is_empty() {
                rows.push(String::new());
            }
            let last = rows.len() - 1;
            rows.into_iter()
                .enumerate()
                .map(|(i, row)| {
                    let mut spans = vec![
                        Span::raw(COMMENT_INDENT),
                        Span::styled(row, theme.comment_text_style().patch(extra)),
                    ];
                    if i == last {
                        spans.push(Span::styled(" - ", theme.dim_style().patch(extra)));
                        spans.push(Span::styled(
                            c.from.name.clone(),
                            theme.author_style().patch(extra),
                        ));
                        // Only the viewer's own comments are deletable
                        if highlight && c.commands.contains(&Command::Delete) {
                            spans.push(Span::styled(" · ", theme.dim_style()));
                            spans.push(Span::styled(
                                Command::Delete.label(),
                                theme.action_style(),
                            ));
                        }
                    }
                    Line::from(spans)
                })
                .collect()
        }
        Comment::Placeholder { body, .. } => {
            let mut spans = vec![
                Span::raw(COMMENT_INDENT),
                Span::styled(body.clone(), theme.action_style().patch(extra)),
            ];
            if state.is_expanding(ListField::Comments) {
                spans.push(Span::styled(" (loading...)", theme.spinner_style()));
            }
            vec![Line::from(spans)]
        }
        Comment::Tombstone { .. } => vec![Line::from(vec![
            Span::raw(COMMENT_INDENT),
            Span::styled(
                "[deleted]",
                theme
                    .dim_style()
                    .add_modifier(Modifier::ITALIC)
                    .patch(extra),
            ),
        ])],
    }
}

fn render_pager(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let paging = app.store.paging();
    let mut spans = Vec::new();
    if paging.has_prev() {
        spans.push(Span::styled("« Prev", theme.action_style()));
        spans.push(Span::raw("  "));
    }
    if paging.has_next() {
        spans.push(Span::styled("Next »", theme.action_style()));
        spans.push(Span::raw("  "));
    }
    if paging.show {
        let page = paging.next_start / PAGE_SIZE;
        spans.push(Span::styled(format!("page {page}"), theme.dim_style()));
    }
    render_with_timestamp(
        frame,
        Line::from(spans),
        app.poll.last_success,
        app.clock.now(),
        theme,
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.input_active() {
        format_items(&form_items(), &form_keymap())
    } else {
        format_items(&feed_compact_items(), &global_keymap().extend(feed_keymap()))
    };
    let loading = format!("{} Polling", spinner_frame(app.poll.loading_start));

    let mut bar = StatusBar::new(&app.theme)
        .label("ffeed")
        .help(&help_text);
    if app.poll.should_show_spinner() {
        bar = bar.loading(&loading);
    }
    if let Some(err) = &app.poll.error {
        bar = bar.error(err);
    }
    if !app.store.is_empty() {
        bar = bar.position(app.selected_index + 1, app.store.len());
    }
    bar.render(frame, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        CommentBuilder, EntryBuilder, SnapshotBuilder, TestAppBuilder, sample_snapshot,
    };
    use crate::views::tests::render_to_string;

    fn render_app(app: &App, width: u16, height: u16) -> String {
        render_to_string(width, height, |frame| render(frame, app, frame.area()))
    }

    #[test]
    fn test_empty_feed_shows_loading() {
        let app = TestAppBuilder::new().build();
        let output = render_app(&app, 60, 10);
        assert!(output.contains("Loading feed..."));
    }

    #[test]
    fn test_error_without_entries() {
        let app = TestAppBuilder::new().error("Server error.").build();
        let output = render_app(&app, 60, 10);
        assert!(output.contains("Error"));
        assert!(output.contains("Server error."));
    }

    #[test]
    fn test_entry_rendering() {
        let app = TestAppBuilder::new()
            .with_snapshot(sample_snapshot())
            .build();
        let output = render_app(&app, 80, 40);

        assert!(output.contains("Bret"));
        assert!(output.contains("Shipping the *new* feed today"));
        assert!(output.contains("1d ago · Comment · Like"));
        assert!(output.contains("♥ Paul and 3 other people liked this"));
        assert!(output.contains("Congrats! - Jim"));
        assert!(output.contains("2 more comments"));
        assert!(output.contains("Jim → Friends"));
        assert!(output.contains("1/3"));
    }

    #[test]
    fn test_affordance_follows_commands() {
        let app = TestAppBuilder::new()
            .with_snapshot(sample_snapshot())
            .build();
        let output = render_app(&app, 80, 40);
        // e2 is already liked by the viewer
        assert!(output.contains("· Comment · Unlike"));
    }

    #[test]
    fn test_tombstone_rendering() {
        let mut app = TestAppBuilder::new()
            .with_snapshot(
                SnapshotBuilder::new()
                    .entry(
                        EntryBuilder::new()
                            .id("a")
                            .comments(vec![
                                CommentBuilder::new().id("c1").body("going away").build(),
                                CommentBuilder::new().id("c2").body("staying").build(),
                            ])
                            .build(),
                    )
                    .build(),
            )
            .build();
        app.store.delete_comment("a", "c1").unwrap();

        let output = render_app(&app, 60, 20);
        assert!(output.contains("[deleted]"));
        assert!(!output.contains("going away"));
        assert!(output.contains("staying"));
    }

    #[test]
    fn test_delete_hint_only_on_deletable_selected_comment() {
        let snapshot = SnapshotBuilder::new()
            .entry(
                EntryBuilder::new()
                    .id("a")
                    .comments(vec![
                        CommentBuilder::new()
                            .id("c1")
                            .body("mine")
                            .author("Me")
                            .build(),
                        CommentBuilder::new()
                            .id("c2")
                            .body("theirs")
                            .author("Al")
                            .commands(vec![])
                            .build(),
                    ])
                    .build(),
            )
            .build();

        let app = TestAppBuilder::new()
            .with_snapshot(snapshot.clone())
            .selected_comment(0)
            .build();
        let output = render_app(&app, 60, 20);
        assert!(output.contains("mine - Me · Delete"));

        let app = TestAppBuilder::new()
            .with_snapshot(snapshot)
            .selected_comment(1)
            .build();
        let output = render_app(&app, 60, 20);
        assert!(output.contains("theirs - Al"));
        assert!(!output.contains("Delete"));
    }

    #[test]
    fn test_open_form_shows_draft_and_form_help() {
        let mut app = TestAppBuilder::new()
            .with_snapshot(sample_snapshot())
            .build();
        app.store.open_comment_form("e1").unwrap();
        *app.store.comment_draft_mut("e1").unwrap() = "half a thought".to_string();

        let output = render_app(&app, 80, 40);
        assert!(output.contains("> half a thought"));
        assert!(output.contains("Enter:post"));
        assert!(!output.contains("l:like"));
    }

    #[test]
    fn test_pager_on_first_page() {
        let app = TestAppBuilder::new()
            .with_snapshot(sample_snapshot())
            .build();
        let output = render_app(&app, 80, 40);
        assert!(output.contains("Next »"));
        assert!(!output.contains("« Prev"));
    }

    #[test]
    fn test_pager_on_later_page() {
        let app = TestAppBuilder::new()
            .with_snapshot(
                SnapshotBuilder::with_ids(&["a"])
                    .paging(crate::api::Paging {
                        prev_start: 30,
                        next_start: 90,
                        show: true,
                    })
                    .build(),
            )
            .build();
        let output = render_app(&app, 60, 12);
        assert!(output.contains("« Prev"));
        assert!(output.contains("Next »"));
        assert!(output.contains("page 3"));
    }

    #[test]
    fn test_feed_title() {
        assert_eq!(feed_title("/home?start=30"), " home ");
        assert_eq!(feed_title("/friends"), " friends ");
    }
}
