use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{ApiError, Comment, FeedClient, FeedSnapshot, Like, page_path};
use crate::feed::{ActionError, ActionRequest, EntryViewState, FeedStore, ListField, Stamp};
use crate::poller;
use crate::theme::ResolvedTheme;
use crate::time::Clock;

pub enum AsyncResult {
    PollTick,
    Snapshot {
        generation: u64,
        seq: u64,
        fetch_started: Stamp,
        task_id: u64,
        result: Result<FeedSnapshot, ApiError>,
    },
    Liked {
        entry: String,
        liked: bool,
        task_id: u64,
        result: Result<Vec<Like>, ApiError>,
    },
    CommentPosted {
        entry: String,
        task_id: u64,
        result: Result<Comment, ApiError>,
    },
    CommentDeleted {
        entry: String,
        comment: String,
        task_id: u64,
        result: Result<(), ApiError>,
    },
    CommentsExpanded {
        entry: String,
        task_id: u64,
        result: Result<Vec<Comment>, ApiError>,
    },
    LikesExpanded {
        entry: String,
        task_id: u64,
        result: Result<Vec<Like>, ApiError>,
    },
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.log.push_back(LogEntry {
            message: msg.into(),
        });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Polling status shown in the status bar.
///
/// Polls may overlap; `seq` orders them so an older snapshot never
/// overwrites a newer one.
#[derive(Debug, Default)]
pub struct PollState {
    pub in_flight: usize,
    pub loading_start: Option<Instant>,
    pub last_success: Option<DateTime<Utc>>,
    pub error: Option<String>,
    next_seq: u64,
    applied_seq: u64,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self) -> u64 {
        self.in_flight += 1;
        self.loading_start = Some(Instant::now());
        self.next_seq += 1;
        self.next_seq
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: Duration = Duration::from_millis(500);
        if let Some(start) = self.loading_start {
            self.is_loading() || start.elapsed() < MIN_SPINNER_DURATION
        } else {
            false
        }
    }

    /// Whether a response with `seq` is newer than the last applied one.
    fn accepts(&self, seq: u64) -> bool {
        seq > self.applied_seq
    }

    /// Forget sequence history, e.g. after the page changed.
    fn reset(&mut self) {
        self.in_flight = 0;
        self.applied_seq = self.next_seq;
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    NextComment,
    PrevComment,
    OpenCommentForm,
    SubmitComment,
    CancelComment,
    InputChar(char),
    InputBackspace,
    ToggleLike,
    DeleteComment,
    ExpandComments,
    ExpandLikes,
    NextPage,
    PrevPage,
    OpenPermalink,
    PollNow,
    ToggleHelp,
    ToggleDebug,
    Quit,
}

pub struct App {
    pub store: FeedStore,
    pub client: FeedClient,
    /// Path (and query) of the feed page being shown.
    pub feed_path: String,
    pub selected_index: usize,
    /// Selected comment within the selected entry, if any.
    pub selected_comment: Option<usize>,
    pub poll: PollState,
    pub should_quit: bool,
    pub show_help: bool,
    pub theme: ResolvedTheme,
    pub clock: Arc<dyn Clock>,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    pub generation: u64,
    // Debug pane
    pub debug: DebugState,
}

impl App {
    pub fn new(client: FeedClient, feed_path: String, theme: ResolvedTheme) -> Self {
        let (result_tx, result_rx) = mpsc::channel(32);
        Self {
            store: FeedStore::new(),
            client,
            feed_path,
            selected_index: 0,
            selected_comment: None,
            poll: PollState::new(),
            should_quit: false,
            show_help: false,
            theme,
            clock: crate::time::system_clock(),
            result_tx,
            result_rx,
            generation: 0,
            debug: DebugState::new(),
        }
    }

    /// Start the poll timer. The first poll fires immediately.
    pub fn start_polling(&self, interval: Duration) -> JoinHandle<()> {
        tracing::info!(feed = %self.feed_path, ?interval, "starting poller");
        poller::spawn_timer(interval, self.result_tx.clone())
    }

    pub fn selected_entry(&self) -> Option<&EntryViewState> {
        self.store.get_index(self.selected_index)
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_entry().map(|s| s.id().to_string())
    }

    pub fn selected_comment(&self) -> Option<&Comment> {
        let state = self.selected_entry()?;
        state.comments().get(self.selected_comment?)
    }

    /// Keystrokes go to the comment form of the selected entry when it is open.
    pub fn input_active(&self) -> bool {
        self.selected_entry()
            .is_some_and(|s| s.comment_form().open)
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::PollTick => self.poll(),
            AsyncResult::Snapshot {
                generation,
                seq,
                fetch_started,
                task_id,
                result,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (other page)");
                    return;
                }
                self.poll.finish();
                if !self.poll.accepts(seq) {
                    tracing::debug!(seq, applied = self.poll.applied_seq, "stale snapshot");
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.finish_task(task_id, &result);
                match result {
                    Ok(snapshot) => self.apply_snapshot(seq, snapshot, fetch_started),
                    Err(e) => {
                        tracing::warn!(error = %e, feed = %self.feed_path, "poll failed");
                        self.poll.error = Some(e.user_message());
                    }
                }
            }
            AsyncResult::Liked {
                entry,
                liked,
                task_id,
                result,
            } => {
                self.finish_task(task_id, &result);
                if let Ok(likes) = result {
                    self.store.apply_like_response(&entry, liked, likes);
                }
            }
            AsyncResult::CommentPosted {
                entry,
                task_id,
                result,
            } => {
                self.finish_task(task_id, &result);
                match result {
                    Ok(comment) => {
                        self.store.apply_comment_posted(&entry, comment);
                    }
                    Err(_) => self.store.apply_comment_failed(&entry),
                }
            }
            AsyncResult::CommentDeleted {
                entry,
                comment,
                task_id,
                result,
            } => {
                // The tombstone stays either way.
                self.finish_task(task_id, &result);
                tracing::debug!(%entry, %comment, ok = result.is_ok(), "delete acknowledged");
            }
            AsyncResult::CommentsExpanded {
                entry,
                task_id,
                result,
            } => {
                self.finish_task(task_id, &result);
                match result {
                    Ok(comments) => {
                        self.store.apply_expanded_comments(&entry, comments);
                    }
                    Err(_) => self.store.expansion_failed(&entry, ListField::Comments),
                }
            }
            AsyncResult::LikesExpanded {
                entry,
                task_id,
                result,
            } => {
                self.finish_task(task_id, &result);
                match result {
                    Ok(likes) => {
                        self.store.apply_expanded_likes(&entry, likes);
                    }
                    Err(_) => self.store.expansion_failed(&entry, ListField::Likes),
                }
            }
        }
    }

    fn finish_task<T>(&mut self, task_id: u64, result: &Result<T, ApiError>) {
        match result {
            Ok(_) => self.debug.end_task(task_id, "completed"),
            Err(e) => {
                tracing::warn!(task_id, error = %e, "request failed");
                self.debug.end_task(task_id, "failed");
            }
        }
    }

    fn apply_snapshot(&mut self, seq: u64, snapshot: FeedSnapshot, fetch_started: Stamp) {
        let selected = self.selected_id();
        tracing::info!(
            seq,
            entries = snapshot.entries.len(),
            feed = %self.feed_path,
            "poll applied"
        );
        self.store.reconcile(snapshot, fetch_started);
        self.poll.applied_seq = seq;
        self.poll.last_success = Some(self.clock.now());
        self.poll.error = None;

        // Follow the selected entry if it moved; otherwise stay in bounds.
        match selected.and_then(|id| self.store.position(&id)) {
            Some(pos) => self.selected_index = pos,
            None => {
                self.selected_index = self.selected_index.min(self.store.len().saturating_sub(1));
                self.selected_comment = None;
            }
        }
        self.clamp_comment_selection();
    }

    fn clamp_comment_selection(&mut self) {
        let count = self.selected_entry().map_or(0, |s| s.comments().len());
        if let Some(idx) = self.selected_comment
            && idx >= count
        {
            self.selected_comment = count.checked_sub(1);
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::SelectNext => self.select_next(),
            Message::SelectPrev => self.select_prev(),
            Message::SelectFirst => self.select(0),
            Message::SelectLast => self.select(self.store.len().saturating_sub(1)),
            Message::NextComment => self.next_comment(),
            Message::PrevComment => self.prev_comment(),
            Message::OpenCommentForm => self.with_selected(|store, id| {
                store.open_comment_form(id).map(|_| None)
            }),
            Message::SubmitComment => {
                self.with_selected(|store, id| store.submit_comment(id).map(Some))
            }
            Message::CancelComment => {
                self.with_selected(|store, id| store.cancel_comment(id).map(|_| None))
            }
            Message::InputChar(c) => {
                if let Some(id) = self.selected_id()
                    && let Some(draft) = self.store.comment_draft_mut(&id)
                {
                    draft.push(c);
                }
            }
            Message::InputBackspace => {
                if let Some(id) = self.selected_id()
                    && let Some(draft) = self.store.comment_draft_mut(&id)
                {
                    draft.pop();
                }
            }
            Message::ToggleLike => self.with_selected(|store, id| store.toggle_like(id).map(Some)),
            Message::DeleteComment => self.delete_selected_comment(),
            Message::ExpandComments => {
                self.with_selected(|store, id| store.expand_comments(id).map(Some))
            }
            Message::ExpandLikes => {
                self.with_selected(|store, id| store.expand_likes(id).map(Some))
            }
            Message::NextPage => {
                let paging = self.store.paging();
                if paging.has_next() {
                    self.change_page(paging.next_start);
                }
            }
            Message::PrevPage => {
                let paging = self.store.paging();
                if paging.has_prev() {
                    self.change_page(paging.prev_start);
                }
            }
            Message::OpenPermalink => self.open_permalink(),
            Message::PollNow => self.poll(),
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => self.debug.toggle(),
            Message::Quit => self.should_quit = true,
        }
    }

    /// Run an action against the selected entry and dispatch what it asks for.
    ///
    /// Rejected actions leave no trace beyond a debug log line.
    fn with_selected<F>(&mut self, action: F)
    where
        F: FnOnce(&mut FeedStore, &str) -> Result<Option<ActionRequest>, ActionError>,
    {
        let Some(id) = self.selected_id() else {
            return;
        };
        match action(&mut self.store, &id) {
            Ok(Some(request)) => self.dispatch(request),
            Ok(None) => {}
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, error: ActionError) {
        tracing::debug!(%error, "action ignored");
        self.debug.log(format!("Ignored: {error}"));
    }

    fn delete_selected_comment(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(comment_id) = self.selected_comment().and_then(Comment::id).map(String::from)
        else {
            return;
        };
        match self.store.delete_comment(&id, &comment_id) {
            Ok(request) => self.dispatch(request),
            Err(e) => self.reject(e),
        }
    }

    fn select(&mut self, index: usize) {
        if index != self.selected_index {
            self.selected_index = index;
            self.selected_comment = None;
        }
    }

    fn select_next(&mut self) {
        let count = self.store.len();
        if count > 0 && self.selected_index < count - 1 {
            self.select(self.selected_index + 1);
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.select(self.selected_index - 1);
        }
    }

    fn next_comment(&mut self) {
        let count = self.selected_entry().map_or(0, |s| s.comments().len());
        if count == 0 {
            return;
        }
        self.selected_comment = Some(match self.selected_comment {
            None => 0,
            Some(i) => (i + 1).min(count - 1),
        });
    }

    fn prev_comment(&mut self) {
        self.selected_comment = match self.selected_comment {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    fn open_permalink(&mut self) {
        let Some(url) = self
            .selected_entry()
            .and_then(|s| self.client.absolute(&s.entry().permalink()))
        else {
            return;
        };
        if let Err(e) = open::that(&url) {
            tracing::warn!(%url, error = %e, "could not open browser");
            self.debug.log(format!("Open failed: {e}"));
        }
    }

    fn change_page(&mut self, start: u32) {
        self.feed_path = page_path(&self.feed_path, start);
        tracing::info!(feed = %self.feed_path, "changing page");
        self.generation += 1;
        self.store.clear();
        self.poll.reset();
        self.selected_index = 0;
        self.selected_comment = None;
        self.poll();
    }

    /// Fetch the current page once. Overlapping polls are allowed.
    pub fn poll(&mut self) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let feed_path = self.feed_path.clone();
        let generation = self.generation;
        let seq = self.poll.begin();
        let fetch_started = self.store.stamp();
        let task_id = self.debug.start_task(format!("Poll {feed_path}"));

        tokio::spawn(async move {
            let result = client.fetch_snapshot(&feed_path).await;
            let _ = tx
                .send(AsyncResult::Snapshot {
                    generation,
                    seq,
                    fetch_started,
                    task_id,
                    result,
                })
                .await;
        });
    }

    /// Spawn the server call for an accepted action.
    fn dispatch(&mut self, request: ActionRequest) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(request.describe());
        tracing::debug!(task_id, request = %request.describe(), "dispatching");

        tokio::spawn(async move {
            let msg = match request {
                ActionRequest::Like { entry } => {
                    let result = client.like(&entry).await;
                    AsyncResult::Liked {
                        entry,
                        liked: true,
                        task_id,
                        result,
                    }
                }
                ActionRequest::Unlike { entry } => {
                    let result = client.unlike(&entry).await;
                    AsyncResult::Liked {
                        entry,
                        liked: false,
                        task_id,
                        result,
                    }
                }
                ActionRequest::PostComment { entry, body } => {
                    let result = client.post_comment(&entry, &body).await;
                    AsyncResult::CommentPosted {
                        entry,
                        task_id,
                        result,
                    }
                }
                ActionRequest::DeleteComment { entry, comment } => {
                    let result = client.delete_comment(&entry, &comment).await;
                    AsyncResult::CommentDeleted {
                        entry,
                        comment,
                        task_id,
                        result,
                    }
                }
                ActionRequest::Expand {
                    entry,
                    field: ListField::Comments,
                } => {
                    let result = client.expand_comments(&entry).await;
                    AsyncResult::CommentsExpanded {
                        entry,
                        task_id,
                        result,
                    }
                }
                ActionRequest::Expand {
                    entry,
                    field: ListField::Likes,
                } => {
                    let result = client.expand_likes(&entry).await;
                    AsyncResult::LikesExpanded {
                        entry,
                        task_id,
                        result,
                    }
                }
            };
            let _ = tx.send(msg).await;
        });
    }
}
