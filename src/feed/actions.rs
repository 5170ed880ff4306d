//! User actions on entries: like/unlike, posting and deleting comments.
//!
//! Each action checks its precondition against the store and returns the
//! request to send; the matching `apply_*` method folds the server's answer
//! back in. Only comment deletion changes state before the server answers.

use std::fmt;

use super::state::ListField;
use super::store::FeedStore;
use crate::api::{Command, Comment, Like};

/// A server call produced by a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Like { entry: String },
    Unlike { entry: String },
    PostComment { entry: String, body: String },
    DeleteComment { entry: String, comment: String },
    Expand { entry: String, field: ListField },
}

impl ActionRequest {
    pub fn entry(&self) -> &str {
        match self {
            ActionRequest::Like { entry }
            | ActionRequest::Unlike { entry }
            | ActionRequest::PostComment { entry, .. }
            | ActionRequest::DeleteComment { entry, .. }
            | ActionRequest::Expand { entry, .. } => entry,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ActionRequest::Like { entry } => format!("Like {entry}"),
            ActionRequest::Unlike { entry } => format!("Unlike {entry}"),
            ActionRequest::PostComment { entry, .. } => format!("Comment on {entry}"),
            ActionRequest::DeleteComment { entry, comment } => {
                format!("Delete comment {comment} on {entry}")
            }
            ActionRequest::Expand { entry, field } => {
                format!("Expand {} of {entry}", field.label())
            }
        }
    }
}

/// A user action whose precondition did not hold. No request is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    UnknownEntry(String),
    NotPermitted(Command),
    FormClosed,
    EmptyComment,
    SubmitPending,
    NotDeletable(String),
    NothingToExpand(ListField),
    AlreadyExpanded(ListField),
    InFlight(ListField),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntry(id) => write!(f, "no entry {id}"),
            Self::NotPermitted(cmd) => write!(f, "{} not permitted here", cmd.label()),
            Self::FormClosed => write!(f, "comment form is not open"),
            Self::EmptyComment => write!(f, "comment is empty"),
            Self::SubmitPending => write!(f, "a comment is already being posted"),
            Self::NotDeletable(id) => write!(f, "comment {id} cannot be deleted"),
            Self::NothingToExpand(field) => write!(f, "{} already complete", field.label()),
            Self::AlreadyExpanded(field) => write!(f, "{} already expanded", field.label()),
            Self::InFlight(field) => write!(f, "{} are loading", field.label()),
        }
    }
}

impl std::error::Error for ActionError {}

impl FeedStore {
    fn require(&self, id: &str, command: Command) -> Result<(), ActionError> {
        let state = self
            .get(id)
            .ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if !state.can(command) {
            return Err(ActionError::NotPermitted(command));
        }
        Ok(())
    }

    pub fn like(&self, id: &str) -> Result<ActionRequest, ActionError> {
        self.require(id, Command::Like)?;
        Ok(ActionRequest::Like {
            entry: id.to_string(),
        })
    }

    pub fn unlike(&self, id: &str) -> Result<ActionRequest, ActionError> {
        self.require(id, Command::Unlike)?;
        Ok(ActionRequest::Unlike {
            entry: id.to_string(),
        })
    }

    /// Like or unlike, whichever affordance the entry currently shows.
    pub fn toggle_like(&self, id: &str) -> Result<ActionRequest, ActionError> {
        match self.like(id) {
            Err(ActionError::NotPermitted(_)) => self.unlike(id),
            other => other,
        }
    }

    /// Fold in the authoritative like list after a like (`liked`) or unlike.
    ///
    /// Returns false if the entry is gone.
    pub fn apply_like_response(&mut self, id: &str, liked: bool, likes: Vec<Like>) -> bool {
        let Some(state) = self.get_mut(id) else {
            tracing::debug!(id, "like response for destroyed entry");
            return false;
        };
        state.likes = likes;
        let (from, to) = if liked {
            (Command::Like, Command::Unlike)
        } else {
            (Command::Unlike, Command::Like)
        };
        if !state.flip_command(from, to) {
            tracing::debug!(id, liked, "like affordance already flipped");
        }
        true
    }

    /// Open the comment form, or leave it as is if it is already open.
    pub fn open_comment_form(&mut self, id: &str) -> Result<bool, ActionError> {
        self.require(id, Command::Comment)?;
        let state = self
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        Ok(state.comment_form.open())
    }

    /// Draft text of an open comment form, for editing.
    pub fn comment_draft_mut(&mut self, id: &str) -> Option<&mut String> {
        self.get_mut(id)
            .filter(|s| s.comment_form.open)
            .map(|s| &mut s.comment_form.draft)
    }

    pub fn cancel_comment(&mut self, id: &str) -> Result<(), ActionError> {
        let state = self
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if !state.comment_form.open {
            return Err(ActionError::FormClosed);
        }
        state.comment_form.cancel();
        Ok(())
    }

    /// Submit the draft. Blank drafts are discarded and the form stays open.
    pub fn submit_comment(&mut self, id: &str) -> Result<ActionRequest, ActionError> {
        let state = self
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        let form = &mut state.comment_form;
        if !form.open {
            return Err(ActionError::FormClosed);
        }
        if form.pending.is_some() {
            return Err(ActionError::SubmitPending);
        }
        let body = form.take_submission().ok_or(ActionError::EmptyComment)?;
        Ok(ActionRequest::PostComment {
            entry: id.to_string(),
            body,
        })
    }

    pub fn apply_comment_posted(&mut self, id: &str, comment: Comment) -> bool {
        let Some(state) = self.get_mut(id) else {
            tracing::debug!(id, "comment response for destroyed entry");
            return false;
        };
        state.comments.push(comment);
        state.comment_form.complete();
        true
    }

    pub fn apply_comment_failed(&mut self, id: &str) {
        if let Some(state) = self.get_mut(id) {
            state.comment_form.restore_pending();
        }
    }

    /// Tombstone a comment right away and return the fire-and-forget request.
    ///
    /// The comment itself must carry the `delete` capability; the server only
    /// grants it on the viewer's own comments.
    pub fn delete_comment(
        &mut self,
        id: &str,
        comment_id: &str,
    ) -> Result<ActionRequest, ActionError> {
        let stamp = self.stamp + 1;
        let state = self
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        let slot = state
            .comments
            .iter_mut()
            .find(|c| matches!(c, Comment::Realized(r) if !r.id.is_empty() && r.id == comment_id))
            .ok_or_else(|| ActionError::NotDeletable(comment_id.to_string()))?;
        if let Comment::Realized(realized) = slot
            && !realized.commands.contains(&Command::Delete)
        {
            return Err(ActionError::NotPermitted(Command::Delete));
        }
        *slot = Comment::Tombstone {
            id: comment_id.to_string(),
        };
        state.tombstones.insert(comment_id.to_string(), stamp);
        self.bump_stamp();
        Ok(ActionRequest::DeleteComment {
            entry: id.to_string(),
            comment: comment_id.to_string(),
        })
    }
}
