//! Bounded undo/redo history
//!
//! A linear log of snapshots with a cursor. Pushing while the cursor is
//! behind the tail discards the redo branch; pushing past capacity evicts
//! the oldest entry.

use std::collections::VecDeque;

/// Default number of snapshots retained
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear undo/redo buffer
#[derive(Debug, Clone)]
pub struct HistoryManager<T> {
    entries: VecDeque<T>,
    /// Index of the current entry, `None` while empty
    cursor: Option<usize>,
    limit: usize,
}

impl<T: Clone> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T: Clone> HistoryManager<T> {
    /// Create a history holding at most `limit` entries (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Record a new state at the cursor
    pub fn push(&mut self, state: T) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push_back(state);
        let mut cursor = self.entries.len() - 1;

        if self.entries.len() > self.limit {
            self.entries.pop_front();
            cursor -= 1;
        }
        self.cursor = Some(cursor);
    }

    /// Step back one entry, returning it
    pub fn undo(&mut self) -> Option<T> {
        let cursor = self.cursor.filter(|c| *c > 0)?;
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1).cloned()
    }

    /// Step forward one entry, returning it
    pub fn redo(&mut self) -> Option<T> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if self.cursor.is_none() || next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entries.get(next).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position, `None` while empty
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Copy of the full sequence, oldest first
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> HistoryManager<String> {
        HistoryManager::new(5)
    }

    #[test]
    fn test_push() {
        let mut history = small();
        history.push("1".to_string());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn test_undo_redo() {
        let mut history = small();
        history.push("1".to_string());
        history.push("2".to_string());

        assert_eq!(history.undo().as_deref(), Some("1"));
        assert_eq!(history.current_index(), Some(0));

        assert_eq!(history.redo().as_deref(), Some("2"));
        assert_eq!(history.current_index(), Some(1));
    }

    #[test]
    fn test_push_truncates_redo_branch() {
        let mut history = small();
        history.push("1".to_string());
        history.push("2".to_string());
        history.undo();
        history.push("3".to_string());

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo().as_deref(), Some("1"));
        assert_eq!(history.redo().as_deref(), Some("3"));
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = HistoryManager::new(2);
        history.push("1".to_string());
        history.push("2".to_string());
        history.push("3".to_string());

        assert_eq!(history.len(), 2);
        assert_eq!(history.current_index(), Some(1));
        assert_eq!(history.undo().as_deref(), Some("2"));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_nothing_to_undo_or_redo() {
        let mut history = small();
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current_index(), None);

        history.push("1".to_string());
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_snapshot_copy() {
        let mut history = small();
        history.push("1".to_string());
        history.push("2".to_string());
        assert_eq!(history.snapshot(), vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let mut history = HistoryManager::new(0);
        history.push("1".to_string());
        history.push("2".to_string());
        assert_eq!(history.limit(), 1);
        assert_eq!(history.snapshot(), vec!["2".to_string()]);
    }
}
