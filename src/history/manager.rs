use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::history::debounce::Debouncer;
use crate::model::document::Document;

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Linear undo log of document snapshots with debounced coalescing.
///
/// Edits are `schedule`d; a snapshot is appended only once the quiet period passes
/// and only if it differs from the entry under the cursor. Appending past the cursor
/// drops the redo tail. The oldest entry is evicted once `capacity` is exceeded.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Arc<Document>>,
    cursor: usize,
    capacity: usize,
    pending: Debouncer<Arc<Document>>,
}

impl History {
    pub fn new(initial: Arc<Document>) -> Self {
        Self::with_settings(initial, DEFAULT_CAPACITY, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_settings(initial: Arc<Document>, capacity: usize, quiet: Duration) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            capacity: capacity.max(1),
            pending: Debouncer::new(quiet),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Arc<Document> {
        &self.entries[self.cursor]
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0 || self.pending_differs()
    }

    /// A differing pending edit would truncate the redo tail when flushed.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len() && !self.pending_differs()
    }

    fn pending_differs(&self) -> bool {
        self.pending
            .peek()
            .is_some_and(|p| **p != **self.current())
    }

    /// Record `snapshot` as the latest edit; it is committed after the quiet period.
    pub fn schedule(&mut self, now: Instant, snapshot: Arc<Document>) {
        self.pending.schedule(now, snapshot);
    }

    /// Commit the pending snapshot if it is due. Returns whether an entry was appended.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.poll(now) {
            Some(s) => self.commit(s),
            None => false,
        }
    }

    /// Commit the pending snapshot right away.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(s) => self.commit(s),
            None => false,
        }
    }

    /// Append `snapshot` unless it equals the entry under the cursor.
    pub fn commit(&mut self, snapshot: Arc<Document>) -> bool {
        let head = &self.entries[self.cursor];
        if Arc::ptr_eq(head, &snapshot) || **head == *snapshot {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            let overflow = self.entries.len() - self.capacity;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Step back. A pending edit is flushed first so it is itself undoable.
    pub fn undo(&mut self) -> Option<Arc<Document>> {
        self.flush();
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    pub fn redo(&mut self) -> Option<Arc<Document>> {
        self.flush();
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: Arc<Document>) {
        self.pending.cancel();
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/manager.rs"]
mod tests;
