//! Deduplicating union of skip records

use crate::models::SkipInfo;
use std::collections::HashSet;

/// Ordered skip records plus a structural index of what is already present.
#[derive(Debug, Default)]
pub struct SkipList {
    items: Vec<SkipInfo>,
    seen: HashSet<SkipInfo>,
}

impl SkipList {
    /// Wrap existing records; they are kept exactly as given.
    #[must_use]
    pub fn new(items: Vec<SkipInfo>) -> Self {
        let seen = items.iter().cloned().collect();
        Self { items, seen }
    }

    /// Append the records not structurally equal to one already present,
    /// returning how many were added.
    pub fn merge<I>(&mut self, skips: I) -> usize
    where
        I: IntoIterator<Item = SkipInfo>,
    {
        let before = self.items.len();
        for skip in skips {
            if self.seen.insert(skip.clone()) {
                self.items.push(skip);
            }
        }
        self.items.len() - before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SkipInfo> {
        self.items
    }
}
