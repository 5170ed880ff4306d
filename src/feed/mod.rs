//! Feed entry state: the store, snapshot reconciliation, user actions and
//! list expansion.

mod actions;
mod expand;
mod reconcile;
mod state;
mod store;

pub use actions::{ActionError, ActionRequest};
pub use state::{CommentForm, EntryViewState, ListField, Stamp};
pub use store::FeedStore;
