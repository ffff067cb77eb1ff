//! Bounded change log.
//!
//! Entries are kept in chronological order. Once the log holds `capacity`
//! entries, recording another one evicts the oldest.

use super::entry::LogEntry;
use std::collections::VecDeque;
use std::time::Duration;

/// Ordered, size-bounded sequence of log entries.
///
/// # Example
///
/// ```rust
/// use statesight::core::{ChangeLog, LogEntry, Snapshot, Value};
///
/// let mut log = ChangeLog::new(2);
/// log.record(LogEntry::initial(Snapshot::new()));
/// log.record(LogEntry::update("x", Value::Unset, Value::Int(1), Snapshot::new()));
/// let evicted = log.record(LogEntry::update("x", Value::Int(1), Value::Int(2), Snapshot::new()));
///
/// assert_eq!(log.len(), 2);
/// assert!(evicted.unwrap().change.is_initial());
/// ```
#[derive(Clone, Debug)]
pub struct ChangeLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl ChangeLog {
    /// Create an empty log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append an entry, returning the evicted oldest entry if the log was full.
    pub fn record(&mut self, entry: LogEntry) -> Option<LogEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Time between the oldest and newest retained entries.
    ///
    /// Returns `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.front(), self.entries.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a LogEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
