use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the log.
pub const MAX_HISTORY: usize = 50;

/// A completed calculation or AI answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: u64,
    pub expression: String,
    pub result: String,
    pub timestamp: DateTime<Local>,
    pub is_ai: bool,
}

/// Bounded newest-first log of calculations.
#[derive(Clone, Debug, Default)]
pub struct History {
    items: VecDeque<HistoryItem>,
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an item with a fresh id and prepend it.
    pub fn record(&mut self, expression: impl Into<String>, result: impl Into<String>, is_ai: bool) -> &HistoryItem {
        let item = HistoryItem {
            id: self.allocate_id(),
            expression: expression.into(),
            result: result.into(),
            timestamp: Local::now(),
            is_ai,
        };
        self.append(item);
        &self.items[0]
    }

    /// Prepend an existing item, evicting the oldest entries past the cap.
    pub fn append(&mut self, item: HistoryItem) {
        // Keep the counter ahead of externally built ids
        self.next_id = self.next_id.max(item.id.saturating_add(1));
        self.items.push_front(item);
        while self.items.len() > MAX_HISTORY {
            if let Some(evicted) = self.items.pop_back() {
                tracing::debug!(id = evicted.id, "history entry evicted");
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    /// Newest entry, if any.
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.items.front()
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryItem;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
