//! Merging polled snapshots into the store.

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;

use super::state::{EntryViewState, Stamp};
use super::store::FeedStore;
use crate::api::{Entry, FeedSnapshot};

impl EntryViewState {
    /// Take a newer payload for this entry without clobbering local state.
    ///
    /// The entry payload is always replaced. Comments and likes are replaced
    /// unless the user expanded them. The comment form is never touched.
    pub(super) fn merge(&mut self, entry: Entry, fetch_started: Stamp) {
        if !self.expanded_comments {
            self.comments = entry.comments.clone();
        }
        if !self.expanded_likes {
            self.likes = entry.likes.clone();
        }
        self.replace_entry(entry);
        self.apply_tombstones(Some(fetch_started));
    }
}

impl FeedStore {
    /// Merge a snapshot whose fetch started at stamp `fetch_started`.
    ///
    /// Entries take the snapshot's order. Entries missing from the snapshot
    /// are destroyed, new ones are created fresh. Reconciling the same
    /// snapshot twice leaves the store unchanged the second time.
    pub fn reconcile(&mut self, snapshot: FeedSnapshot, fetch_started: Stamp) {
        let mut previous = std::mem::take(&mut self.entries);
        let mut next: IndexMap<String, EntryViewState> =
            IndexMap::with_capacity(snapshot.entries.len());
        let mut created = 0usize;

        for entry in snapshot.entries {
            match next.entry(entry.id.clone()) {
                MapEntry::Occupied(mut slot) => {
                    tracing::debug!(id = %entry.id, "duplicate entry in snapshot");
                    slot.get_mut().merge(entry, fetch_started);
                }
                MapEntry::Vacant(slot) => {
                    let state = match previous.swap_remove(&entry.id) {
                        Some(mut state) => {
                            state.merge(entry, fetch_started);
                            state
                        }
                        None => {
                            created += 1;
                            EntryViewState::new(entry)
                        }
                    };
                    slot.insert(state);
                }
            }
        }

        tracing::debug!(
            kept = next.len() - created,
            created,
            dropped = previous.len(),
            "reconciled snapshot"
        );
        self.entries = next;
        self.paging = snapshot.paging;
    }
}
