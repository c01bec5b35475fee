//! Bounded undo/redo history of whole-state snapshots.
//!
//! Each page owns one [`History`] over its element list. Both stacks are
//! fixed-capacity: pushing onto a full stack evicts the oldest entry.

use std::collections::VecDeque;

/// Fixed-capacity LIFO stack that silently drops its oldest entry on overflow.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    /// Create an empty stack. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an entry, evicting the oldest one when full.
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
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

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

/// Undo/redo stacks over snapshots of some state `T`.
///
/// The current state is owned by the caller and passed in by reference, so
/// the history never holds a second copy of it.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: BoundedStack<T>,
    redo: BoundedStack<T>,
}

impl<T> History<T> {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: BoundedStack::new(depth),
            redo: BoundedStack::new(depth),
        }
    }

    /// Replace `current` with `next`, recording the old state for undo.
    /// Clears the redo stack.
    pub fn commit(&mut self, current: &mut T, next: T) {
        let previous = std::mem::replace(current, next);
        if self.undo.push(previous).is_some() {
            log::debug!("History full, dropped oldest undo entry");
        }
        self.redo.clear();
    }

    /// Restore the most recent undo entry. Returns false if there was none.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let undone = std::mem::replace(current, previous);
        self.redo.push(undone);
        true
    }

    /// Re-apply the most recently undone state. Returns false if there was none.
    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, next);
        self.undo.push(replaced);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn depth(&self) -> usize {
        self.undo.capacity()
    }

    /// Undo snapshots, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &T> {
        self.undo.iter()
    }

    /// Forget everything, keeping the configured depth.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HISTORY_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_stack_evicts_oldest() {
        let mut stack = BoundedStack::new(2);
        assert_eq!(stack.push(1), None);
        assert_eq!(stack.push(2), None);
        assert_eq!(stack.push(3), Some(1));
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(stack.pop(), Some(3));
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let stack: BoundedStack<u8> = BoundedStack::new(0);
        assert_eq!(stack.capacity(), 1);
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut history: History<Vec<u32>> = History::new(3);
        let mut current = vec![1];
        assert!(!history.undo(&mut current));
        assert!(!history.redo(&mut current));
        assert_eq!(current, vec![1]);
    }

    #[test]
    fn test_n_undos_restore_initial() {
        let mut history = History::new(50);
        let mut current: Vec<u32> = Vec::new();
        for i in 0..10 {
            let mut next = current.clone();
            next.push(i);
            history.commit(&mut current, next);
        }
        for _ in 0..10 {
            assert!(history.undo(&mut current));
        }
        assert!(current.is_empty());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_interleaved_undo_redo_is_lossless() {
        let mut history = History::new(50);
        let mut current = 0u32;
        for i in 1..=5 {
            history.commit(&mut current, i);
        }
        assert!(history.undo(&mut current));
        assert!(history.undo(&mut current));
        assert_eq!(current, 3);
        assert!(history.redo(&mut current));
        assert_eq!(current, 4);
        assert!(history.undo(&mut current));
        assert!(history.undo(&mut current));
        assert_eq!(current, 2);
        assert!(history.redo(&mut current));
        assert!(history.redo(&mut current));
        assert!(history.redo(&mut current));
        assert_eq!(current, 5);
        assert!(!history.redo(&mut current));
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = History::new(10);
        let mut current = 0u32;
        history.commit(&mut current, 1);
        assert!(history.undo(&mut current));
        assert!(history.can_redo());
        history.commit(&mut current, 7);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_plus_one_commits_keep_most_recent() {
        let depth = 3;
        let mut history = History::new(depth);
        let mut current = 0u32;
        for i in 1..=(depth as u32 + 1) {
            history.commit(&mut current, i);
        }
        assert_eq!(history.undo_len(), depth);
        assert_eq!(history.undo_entries().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_redo_stack_is_bounded() {
        let mut history = History::new(2);
        let mut current = 0u32;
        for i in 1..=2 {
            history.commit(&mut current, i);
        }
        assert!(history.undo(&mut current));
        assert!(history.undo(&mut current));
        assert!(!history.undo(&mut current));
        assert_eq!(history.redo_len(), 2);
        assert_eq!(current, 0);
    }
}
