use indexmap::IndexMap;

use super::state::{EntryViewState, Stamp};
use crate::api::Paging;

/// All live entry view states, keyed by entry id, in display order.
///
/// Mutated only through the reconciler, the action coordinator and the
/// expansion controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStore {
    pub(super) entries: IndexMap<String, EntryViewState>,
    pub(super) paging: Paging,
    pub(super) stamp: Stamp,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&EntryViewState> {
        self.entries.get(id)
    }

    pub(super) fn get_mut(&mut self, id: &str) -> Option<&mut EntryViewState> {
        self.entries.get_mut(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&EntryViewState> {
        self.entries.get_index(index).map(|(_, state)| state)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.get_index_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryViewState> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn paging(&self) -> Paging {
        self.paging
    }

    /// Current local mutation stamp; polls record it when they start.
    pub const fn stamp(&self) -> Stamp {
        self.stamp
    }

    pub(super) fn bump_stamp(&mut self) -> Stamp {
        self.stamp += 1;
        self.stamp
    }

    /// Drop every entry, e.g. when the feed is torn down or the page changes.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.paging = Paging::default();
    }
}
