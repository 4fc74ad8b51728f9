//! Undo/redo history over annotation-set snapshots.
//!
//! Every edit pushes a complete copy of the resulting annotation set. Undo and redo
//! only move a cursor over the stored snapshots; the snapshots themselves are never
//! modified. History is linear: pushing after an undo discards the redo-able future.

use std::collections::VecDeque;

use web_time::SystemTime;

use crate::constants::HISTORY_LIMIT;
use crate::model::AnnotationSet;

/// An immutable snapshot of an annotation set.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    set: AnnotationSet,
    created_at: SystemTime,
    revision: u64,
}

impl HistoryEntry {
    pub fn set(&self) -> &AnnotationSet {
        &self.set
    }

    /// Wall-clock time the snapshot was taken.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Monotonic revision number, unique within one log.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Bounded linear history log with a cursor at the live entry.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    /// Index of the live entry. Only meaningful while `entries` is non-empty.
    cursor: usize,
    max_history: usize,
    next_revision: u64,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl HistoryLog {
    /// Create an empty log holding at most `max_history` entries (at least one).
    pub fn new(max_history: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_history: max_history.max(1),
            next_revision: 0,
        }
    }

    /// Create a log seeded with `initial` as entry 0.
    pub fn with_initial(initial: AnnotationSet, max_history: usize) -> Self {
        let mut log = Self::new(max_history);
        log.push(initial);
        log
    }

    /// Record a new snapshot as the live state.
    ///
    /// Entries after the cursor are discarded first. When the log grows past its
    /// limit the oldest entry is evicted and the cursor shifts down with it.
    pub fn push(&mut self, set: AnnotationSet) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }

        let entry = HistoryEntry {
            set,
            created_at: SystemTime::now(),
            revision: self.next_revision,
        };
        self.next_revision += 1;
        self.entries.push_back(entry);
        self.cursor = self.entries.len() - 1;

        while self.entries.len() > self.max_history {
            self.entries.pop_front();
            self.cursor -= 1;
        }

        log::debug!(
            "History: pushed revision {} ({} entries, cursor {})",
            self.next_revision - 1,
            self.entries.len(),
            self.cursor
        );
    }

    /// Step back one entry and return the set that is now live.
    ///
    /// Returns `None` without changing anything when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&AnnotationSet> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        log::debug!("History: undo to cursor {}", self.cursor);
        self.entries.get(self.cursor).map(HistoryEntry::set)
    }

    /// Step forward one entry and return the set that is now live.
    ///
    /// Returns `None` without changing anything when already at the newest entry.
    pub fn redo(&mut self) -> Option<&AnnotationSet> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        log::debug!("History: redo to cursor {}", self.cursor);
        self.entries.get(self.cursor).map(HistoryEntry::set)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0 && !self.entries.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The live entry, if any entry exists.
    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// The live annotation set, if any entry exists.
    pub fn current(&self) -> Option<&AnnotationSet> {
        self.current_entry().map(HistoryEntry::set)
    }

    /// Revision of the live entry.
    pub fn current_revision(&self) -> Option<u64> {
        self.current_entry().map(HistoryEntry::revision)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
