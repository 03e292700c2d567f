//! Linear undo/redo
//!
//! Two stacks of snapshots. Recording a new action clears the redo stack.

/// Undo/redo stacks over snapshots of type `T`
#[derive(Debug, Clone)]
pub struct UndoHistory<T> {
    undo: Vec<T>,
    redo: Vec<T>,
}

impl<T> UndoHistory<T> {
    pub fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// Save the state as it was before a new action
    pub fn record(&mut self, before: T) {
        self.undo.push(before);
        self.redo.clear();
    }

    /// Pop the previous state; `current` is moved onto the redo stack.
    /// Returns `None` (and never calls `current`) when there is nothing to undo.
    pub fn undo(&mut self, current: impl FnOnce() -> T) -> Option<T> {
        let previous = self.undo.pop()?;
        self.redo.push(current());
        Some(previous)
    }

    /// Mirror of [`undo`](Self::undo)
    pub fn redo(&mut self, current: impl FnOnce() -> T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push(current());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = UndoHistory::new();
        let mut state = 0;

        history.record(state);
        state = 1;
        history.record(state);
        state = 2;

        state = history.undo(|| state).unwrap();
        assert_eq!(state, 1);
        state = history.undo(|| state).unwrap();
        assert_eq!(state, 0);
        assert!(history.undo(|| state).is_none());

        state = history.redo(|| state).unwrap();
        assert_eq!(state, 1);
        state = history.redo(|| state).unwrap();
        assert_eq!(state, 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = UndoHistory::new();
        history.record("a");
        let current = history.undo(|| "b").unwrap();
        assert_eq!(current, "a");
        assert!(history.can_redo());

        history.record("a");
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_empty_undo_does_not_capture() {
        let mut history: UndoHistory<u32> = UndoHistory::new();
        assert!(history.undo(|| panic!("should not snapshot")).is_none());
        assert!(history.redo(|| panic!("should not snapshot")).is_none());
    }
}
