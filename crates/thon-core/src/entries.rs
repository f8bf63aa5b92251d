//! The collection of completed entries, newest first.

use std::collections::VecDeque;

use crate::entry::TimeEntry;
use crate::types::EntryId;

/// Completed entries in most-recent-first order.
///
/// Entries are prepended as sessions stop and removed outright on delete;
/// there is no tombstone.
#[derive(Debug, Clone, Default)]
pub struct EntryLog {
    entries: VecDeque<TimeEntry>,
}

impl EntryLog {
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Adds an entry at the front of the log.
    pub fn prepend(&mut self, entry: TimeEntry) {
        self.entries.push_front(entry);
    }

    /// Removes the entry with the given ID, keeping the order of the rest.
    pub fn delete(&mut self, id: &EntryId) -> Option<TimeEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        self.entries.remove(index)
    }

    /// The most recently added entry.
    pub fn latest(&self) -> Option<&TimeEntry> {
        self.entries.front()
    }

    pub fn get(&self, id: &EntryId) -> Option<&TimeEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a EntryLog {
    type Item = &'a TimeEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, TimeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
