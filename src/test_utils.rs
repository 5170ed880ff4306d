//! Test data builders for feed and view testing.

use std::sync::Arc;

use crate::api::{
    Command, Comment, Entry, FeedClient, FeedRef, FeedSnapshot, Like, Paging, RealizedComment,
};
use crate::app::App;
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};
use crate::time::{Clock, fixed_clock};

/// Fixed timestamp for deterministic tests: 2023-11-16 00:00:00 UTC.
/// Sample data is dated one day earlier, so it renders as "1d ago".
pub const TEST_NOW: i64 = 1700092800;

pub const SAMPLE_DATE: &str = "2023-11-15T00:00:00Z";

fn feed_ref(id: &str, name: &str) -> FeedRef {
    FeedRef {
        id: id.to_string(),
        name: name.to_string(),
        ..FeedRef::default()
    }
}

pub struct EntryBuilder {
    id: String,
    body: String,
    from: FeedRef,
    to: Vec<FeedRef>,
    date: String,
    commands: Vec<Command>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

impl Default for EntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl EntryBuilder {
    pub fn new() -> Self {
        Self {
            id: "1".to_string(),
            body: "Test entry".to_string(),
            from: feed_ref("poster", "Poster"),
            to: vec![],
            date: SAMPLE_DATE.to_string(),
            commands: vec![Command::Comment, Command::Like],
            comments: vec![],
            likes: vec![],
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn author(mut self, name: &str) -> Self {
        self.from = feed_ref(&name.to_lowercase(), name);
        self
    }

    pub fn to(mut self, name: &str) -> Self {
        self.to.push(feed_ref(&name.to_lowercase(), name));
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    pub fn comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn likes(mut self, likes: Vec<Like>) -> Self {
        self.likes = likes;
        self
    }

    pub fn build(self) -> Entry {
        Entry {
            id: self.id,
            date: self.date,
            body: self.body,
            from: self.from,
            to: self.to,
            thumbnails: vec![],
            via: None,
            commands: self.commands,
            comments: self.comments,
            likes: self.likes,
        }
    }
}

pub struct CommentBuilder {
    id: String,
    body: String,
    from: FeedRef,
    commands: Vec<Command>,
}

impl Default for CommentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CommentBuilder {
    pub fn new() -> Self {
        Self {
            id: "c1".to_string(),
            body: "Test comment".to_string(),
            from: feed_ref("commenter", "Commenter"),
            commands: vec![Command::Delete],
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn author(mut self, name: &str) -> Self {
        self.from = feed_ref(&name.to_lowercase(), name);
        self
    }

    pub fn commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    pub fn build(self) -> Comment {
        Comment::Realized(RealizedComment {
            id: self.id,
            body: self.body,
            from: self.from,
            date: SAMPLE_DATE.to_string(),
            commands: self.commands,
        })
    }
}

pub fn placeholder_comment(body: &str, num: u32) -> Comment {
    Comment::Placeholder {
        body: body.to_string(),
        num,
    }
}

pub struct LikeBuilder {
    from: FeedRef,
}

impl Default for LikeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LikeBuilder {
    pub fn new() -> Self {
        Self {
            from: feed_ref("liker", "Liker"),
        }
    }

    pub fn from(mut self, id: &str, name: &str) -> Self {
        self.from = feed_ref(id, name);
        self
    }

    pub fn placeholder(body: &str, num: u32) -> Like {
        Like::Placeholder {
            body: body.to_string(),
            num,
        }
    }

    pub fn build(self) -> Like {
        Like::Realized {
            from: self.from,
            date: SAMPLE_DATE.to_string(),
        }
    }
}

#[derive(Default)]
pub struct SnapshotBuilder {
    entries: Vec<Entry>,
    paging: Paging,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of bare entries with the given ids, in order.
    pub fn with_ids(ids: &[&str]) -> Self {
        ids.iter().fold(Self::new(), |builder, id| {
            builder.entry(EntryBuilder::new().id(id).build())
        })
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn build(self) -> FeedSnapshot {
        FeedSnapshot {
            entries: self.entries,
            paging: self.paging,
        }
    }
}

pub fn sample_snapshot() -> FeedSnapshot {
    SnapshotBuilder::new()
        .entry(
            EntryBuilder::new()
                .id("e1")
                .author("Bret")
                .body("Shipping the <b>new</b> feed today")
                .likes(vec![
                    LikeBuilder::new().from("paul", "Paul").build(),
                    LikeBuilder::placeholder("3 other people", 3),
                ])
                .comments(vec![
                    CommentBuilder::new()
                        .id("c1")
                        .author("Jim")
                        .body("Congrats!")
                        .build(),
                    placeholder_comment("2 more comments", 2),
                    CommentBuilder::new()
                        .id("c4")
                        .author("Sanjeev")
                        .body("Finally")
                        .build(),
                ])
                .build(),
        )
        .entry(
            EntryBuilder::new()
                .id("e2")
                .author("Paul")
                .body("Reading about Rust ownership")
                .commands(vec![Command::Comment, Command::Unlike])
                .build(),
        )
        .entry(
            EntryBuilder::new()
                .id("e3")
                .author("Jim")
                .to("Friends")
                .body("Anyone up for lunch?")
                .commands(vec![])
                .build(),
        )
        .paging(Paging {
            prev_start: 0,
            next_start: 30,
            show: true,
        })
        .build()
}

pub struct TestAppBuilder {
    snapshot: Option<FeedSnapshot>,
    base_url: String,
    feed_path: String,
    selected_index: usize,
    selected_comment: Option<usize>,
    error: Option<String>,
    show_help: bool,
    theme: ResolvedTheme,
    clock: Arc<dyn Clock>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            // Nothing listens on the discard port; spawned requests fail fast.
            base_url: "http://127.0.0.1:9".to_string(),
            feed_path: "/home".to_string(),
            selected_index: 0,
            selected_comment: None,
            error: None,
            show_help: false,
            theme: default_for_variant(ThemeVariant::Dark),
            clock: fixed_clock(TEST_NOW),
        }
    }

    pub fn with_snapshot(mut self, snapshot: FeedSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn feed_path(mut self, path: &str) -> Self {
        self.feed_path = path.to_string();
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn selected_comment(mut self, index: usize) -> Self {
        self.selected_comment = Some(index);
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> App {
        let client = FeedClient::new(&self.base_url).expect("valid test base url");
        let mut app = App::new(client, self.feed_path, self.theme);
        app.clock = self.clock;
        if let Some(snapshot) = self.snapshot {
            app.store.reconcile(snapshot, 0);
        }
        app.selected_index = self.selected_index;
        app.selected_comment = self.selected_comment;
        app.poll.error = self.error;
        app.show_help = self.show_help;
        app
    }
}
