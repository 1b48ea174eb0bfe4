use std::collections::VecDeque;

use crate::models::CommentaryItem;

/// Most-recent-first, capped list of accepted commentary
///
/// Insertion order is the only order; items are never re-sorted by timestamp.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    items: VecDeque<CommentaryItem>,
    cap: usize,
}

impl HistoryBuffer {
    /// A cap of zero is raised to one
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            items: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Prepend, dropping the oldest items past the cap
    pub fn push(&mut self, item: CommentaryItem) {
        self.items.push_front(item);
        self.items.truncate(self.cap);
    }

    /// Change the cap; shrinking truncates the tail immediately
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        self.items.truncate(self.cap);
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&CommentaryItem> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommentaryItem> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_vec(&self) -> Vec<CommentaryItem> {
        self.items.iter().cloned().collect()
    }
}
