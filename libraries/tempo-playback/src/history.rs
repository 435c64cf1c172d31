//! Playback history tracking
//!
//! Bounded stack of queue indices used by "previous". Every mutation
//! returns a new stack so the rewind algorithm can be tested in isolation.

use std::collections::VecDeque;

/// Default history depth
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// History of visited queue indices (most recent = back)
///
/// The top entry is the active index as of the last track change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<usize>,
    limit: usize,
}

impl History {
    /// Create an empty history bounded to `limit` entries (at least one)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Create a fresh history containing only `index`
    pub fn seeded(index: usize, limit: usize) -> Self {
        Self::new(limit).push(index)
    }

    /// Return a history with `index` appended
    ///
    /// If `index` is already on top the stack is returned unchanged. When
    /// full, the oldest entry is discarded.
    #[must_use]
    pub fn push(&self, index: usize) -> Self {
        let mut next = self.clone();
        if next.entries.back() == Some(&index) {
            return next;
        }
        if next.entries.len() >= next.limit {
            next.entries.pop_front();
        }
        next.entries.push_back(index);
        next
    }

    /// Walk one step back
    ///
    /// Pops the current entry and the one beneath it, then pushes the
    /// latter back as the new top. Returns `None` when there is no entry
    /// earlier than the current one.
    pub fn step_back(&self) -> Option<(usize, Self)> {
        if self.entries.len() < 2 {
            return None;
        }

        let mut next = self.clone();
        next.entries.pop_back();
        let previous = next.entries.pop_back()?;
        next.entries.push_back(previous);
        Some((previous, next))
    }

    /// Return an empty history with the same bound
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::new(self.limit)
    }

    /// Most recent entry
    pub fn top(&self) -> Option<usize> {
        self.entries.back().copied()
    }

    /// Entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(indices: &[usize]) -> History {
        indices
            .iter()
            .fold(History::new(10), |history, &index| history.push(index))
    }

    #[test]
    fn push_returns_new_stack() {
        let empty = History::new(10);
        let one = empty.push(3);

        assert!(empty.is_empty());
        assert_eq!(one.top(), Some(3));
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn push_skips_duplicate_top() {
        let history = history_of(&[1, 2]).push(2);
        assert_eq!(history.entries().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn history_bounded() {
        let history = (0..5).fold(History::new(3), |history, index| history.push(index));

        assert_eq!(history.len(), 3);
        assert_eq!(history.entries().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn zero_limit_still_holds_current() {
        let history = History::new(0).push(7);
        assert_eq!(history.limit(), 1);
        assert_eq!(history.top(), Some(7));
    }

    #[test]
    fn step_back_walks_one_entry_at_a_time() {
        let history = history_of(&[0, 1, 2]);

        let (index, history) = history.step_back().unwrap();
        assert_eq!(index, 1);
        assert_eq!(history.entries().collect::<Vec<_>>(), vec![0, 1]);

        let (index, history) = history.step_back().unwrap();
        assert_eq!(index, 0);
        assert_eq!(history.entries().collect::<Vec<_>>(), vec![0]);

        assert!(history.step_back().is_none());
    }

    #[test]
    fn step_back_leaves_original_untouched() {
        let history = history_of(&[4, 9]);
        let _ = history.step_back();
        assert_eq!(history.entries().collect::<Vec<_>>(), vec![4, 9]);
    }

    #[test]
    fn seeded_and_cleared() {
        let history = History::seeded(5, 20);
        assert_eq!(history.top(), Some(5));
        assert_eq!(history.limit(), 20);

        let cleared = history.cleared();
        assert!(cleared.is_empty());
        assert_eq!(cleared.limit(), 20);
    }

    #[test]
    fn default_history() {
        assert_eq!(History::default().limit(), DEFAULT_HISTORY_LIMIT);
    }
}
