//! On-demand loading of full comment and like lists behind placeholders.

use super::actions::{ActionError, ActionRequest};
use super::state::ListField;
use super::store::FeedStore;
use crate::api::{Comment, Like};

impl FeedStore {
    /// Start expanding a collapsed list. Only valid while the list shows a
    /// placeholder, has not been expanded, and no expansion is in flight.
    pub fn expand(&mut self, id: &str, field: ListField) -> Result<ActionRequest, ActionError> {
        let state = self
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if state.is_expanded(field) {
            return Err(ActionError::AlreadyExpanded(field));
        }
        if state.is_expanding(field) {
            return Err(ActionError::InFlight(field));
        }
        if !state.has_placeholder(field) {
            return Err(ActionError::NothingToExpand(field));
        }
        state.set_expanding(field, true);
        Ok(ActionRequest::Expand {
            entry: id.to_string(),
            field,
        })
    }

    pub fn expand_comments(&mut self, id: &str) -> Result<ActionRequest, ActionError> {
        self.expand(id, ListField::Comments)
    }

    pub fn expand_likes(&mut self, id: &str) -> Result<ActionRequest, ActionError> {
        self.expand(id, ListField::Likes)
    }

    /// Pin the full comment list. Later polls will not replace it.
    pub fn apply_expanded_comments(&mut self, id: &str, comments: Vec<Comment>) -> bool {
        let Some(state) = self.get_mut(id) else {
            tracing::debug!(id, "expanded comments for destroyed entry");
            return false;
        };
        state.comments = comments;
        state.expanded_comments = true;
        state.expanding_comments = false;
        state.apply_tombstones(None);
        true
    }

    /// Pin the full like list. Later polls will not replace it.
    pub fn apply_expanded_likes(&mut self, id: &str, likes: Vec<Like>) -> bool {
        let Some(state) = self.get_mut(id) else {
            tracing::debug!(id, "expanded likes for destroyed entry");
            return false;
        };
        state.likes = likes;
        state.expanded_likes = true;
        state.expanding_likes = false;
        true
    }

    /// Let the placeholder be clicked again after a failed expansion.
    pub fn expansion_failed(&mut self, id: &str, field: ListField) {
        if let Some(state) = self.get_mut(id) {
            state.set_expanding(field, false);
        }
    }
}
