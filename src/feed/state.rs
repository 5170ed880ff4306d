//! Per-entry view state: the server payload plus everything the user did
//! locally that polling must not throw away.

use std::collections::HashMap;

use crate::api::{Command, Comment, Entry, Like};

/// Monotonic counter of local mutations, used to order deletes against polls.
pub type Stamp = u64;

/// Draft state of the comment form under one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForm {
    pub open: bool,
    /// Live contents of the textarea.
    pub draft: String,
    /// Text saved by a cancel, restored when the form is reopened.
    pub preserved_text: Option<String>,
    /// Body of a submitted comment whose response has not arrived yet.
    pub pending: Option<String>,
}

impl CommentForm {
    /// Open the form, seeding the draft from a preserved cancel.
    ///
    /// Returns false if the form was already open (caller should just focus it).
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.draft = self.preserved_text.clone().unwrap_or_default();
        true
    }

    pub fn cancel(&mut self) {
        let text = self.draft.trim();
        if !text.is_empty() {
            self.preserved_text = Some(text.to_string());
        }
        self.draft.clear();
        self.open = false;
    }

    /// Move the trimmed draft into `pending`. Returns the body to send.
    pub fn take_submission(&mut self) -> Option<String> {
        let body = self.draft.trim().to_string();
        if body.is_empty() {
            return None;
        }
        self.draft.clear();
        self.pending = Some(body.clone());
        Some(body)
    }

    pub fn complete(&mut self) {
        self.open = false;
        self.draft.clear();
        self.pending = None;
        self.preserved_text = None;
    }

    /// Put a failed submission back into the draft so nothing typed is lost.
    pub fn restore_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if self.draft.trim().is_empty() {
            self.draft = pending;
        } else {
            self.draft = format!("{}\n{}", pending, self.draft);
        }
    }
}

/// Which list-valued field of an entry an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Comments,
    Likes,
}

impl ListField {
    pub fn label(&self) -> &'static str {
        match self {
            ListField::Comments => "comments",
            ListField::Likes => "likes",
        }
    }
}

/// The view of one feed entry that the UI reads.
///
/// Fields are written only by the reconciler, the action coordinator and the
/// expansion controller; everything else reads through the accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryViewState {
    entry: Entry,
    pub(super) comments: Vec<Comment>,
    pub(super) likes: Vec<Like>,
    pub(super) expanded_comments: bool,
    pub(super) expanded_likes: bool,
    pub(super) comment_form: CommentForm,
    pub(super) expanding_comments: bool,
    pub(super) expanding_likes: bool,
    /// Locally deleted comment ids, with the stamp of the delete.
    pub(super) tombstones: HashMap<String, Stamp>,
}

impl EntryViewState {
    pub fn new(entry: Entry) -> Self {
        Self {
            comments: entry.comments.clone(),
            likes: entry.likes.clone(),
            entry,
            expanded_comments: false,
            expanded_likes: false,
            comment_form: CommentForm::default(),
            expanding_comments: false,
            expanding_likes: false,
            tombstones: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn can(&self, command: Command) -> bool {
        self.entry.can(command)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn likes(&self) -> &[Like] {
        &self.likes
    }

    pub fn comment_form(&self) -> &CommentForm {
        &self.comment_form
    }

    /// Swap in a newer payload for the same entry.
    pub(super) fn replace_entry(&mut self, entry: Entry) {
        debug_assert_eq!(entry.id, self.entry.id, "entry id must not change");
        self.entry = entry;
    }

    /// Replace every `from` capability with `to`, in place.
    pub(super) fn flip_command(&mut self, from: Command, to: Command) -> bool {
        let mut flipped = false;
        for cmd in self.entry.commands.iter_mut().filter(|c| **c == from) {
            *cmd = to;
            flipped = true;
        }
        flipped
    }

    pub fn is_expanded(&self, field: ListField) -> bool {
        match field {
            ListField::Comments => self.expanded_comments,
            ListField::Likes => self.expanded_likes,
        }
    }

    pub fn is_expanding(&self, field: ListField) -> bool {
        match field {
            ListField::Comments => self.expanding_comments,
            ListField::Likes => self.expanding_likes,
        }
    }

    pub(super) fn set_expanding(&mut self, field: ListField, value: bool) {
        match field {
            ListField::Comments => self.expanding_comments = value,
            ListField::Likes => self.expanding_likes = value,
        }
    }

    pub fn has_placeholder(&self, field: ListField) -> bool {
        match field {
            ListField::Comments => self.comments.iter().any(Comment::is_placeholder),
            ListField::Likes => self.likes.iter().any(Like::is_placeholder),
        }
    }

    /// Re-apply local deletes to the current comment list.
    ///
    /// With `confirmed_after`, a tombstone whose comment is gone from a fully
    /// listed thread fetched after the delete is forgotten.
    pub(super) fn apply_tombstones(&mut self, confirmed_after: Option<Stamp>) {
        if self.tombstones.is_empty() {
            return;
        }
        for comment in &mut self.comments {
            if let Comment::Realized(c) = comment
                && self.tombstones.contains_key(&c.id)
            {
                let id = c.id.clone();
                *comment = Comment::Tombstone { id };
            }
        }
        let Some(fetch_started) = confirmed_after else {
            return;
        };
        if self.comments.iter().any(Comment::is_placeholder) {
            return;
        }
        let comments = &self.comments;
        self.tombstones.retain(|id, deleted_at| {
            let listed = comments.iter().any(|c| c.id() == Some(id.as_str()));
            listed || fetch_started < *deleted_at
        });
    }
}
