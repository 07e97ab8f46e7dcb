// Turn Queue Domain Model

use super::entry::{Entry, HolderId};
use super::error::{DomainError, Result};
use super::matcher::Matcher;

/// Ordered turn queue: insertion order is turn order, position 0 is current
///
/// Pure data structure. It never arms timers or sends messages; callers
/// inspect the returned state and decide what side effects to run.
#[derive(Debug, Clone, Default)]
pub struct TurnQueue {
    entries: Vec<Entry>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the tail. Duplicates are allowed.
    pub fn push(&mut self, holder: impl Into<HolderId>, metadata: impl Into<String>) {
        self.entries.push(Entry::new(holder, metadata));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn next(&self) -> Option<&Entry> {
        self.entries.get(1)
    }

    pub fn is_current(&self, matcher: impl Matcher) -> bool {
        self.current().is_some_and(|entry| matcher.matches(entry))
    }

    pub fn is_next(&self, matcher: impl Matcher) -> bool {
        self.next().is_some_and(|entry| matcher.matches(entry))
    }

    pub fn contains(&self, matcher: impl Matcher) -> bool {
        self.entries.iter().any(|entry| matcher.matches(entry))
    }

    /// Finish the current turn and hand it to the next entry
    ///
    /// # Errors
    /// `DomainError::EmptyQueue` if nobody holds the turn. Callers must check
    /// `is_current` for the finishing holder first.
    pub fn advance(&mut self) -> Result<Entry> {
        if self.entries.is_empty() {
            return Err(DomainError::EmptyQueue);
        }
        Ok(self.entries.remove(0))
    }

    /// Remove every matching entry, keeping the rest in order
    ///
    /// Returns how many entries were removed (0 when nothing matched).
    pub fn remove(&mut self, matcher: impl Matcher) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !matcher.matches(entry));
        before - self.entries.len()
    }

    /// Read-only view of the queue in turn order
    pub fn get(&self) -> &[Entry] {
        &self.entries
    }

    /// Owned copy of the queue in turn order
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Leading run of entries held by the current holder
    ///
    /// Stops at the first entry with a different holder, so later turns by the
    /// same holder are not part of the run. Empty when the queue is empty.
    pub fn first_group(&self) -> &[Entry] {
        let Some(head) = self.entries.first() else {
            return &[];
        };
        let run = self
            .entries
            .iter()
            .take_while(|entry| entry.holder == head.holder)
            .count();
        &self.entries[..run]
    }
}
