//! Next/previous track selection
//!
//! Pure functions over queue length, current index, modes and history.
//! Callers must reject empty queues before reaching this module; these
//! functions return `None` for them rather than panicking.

use crate::history::History;
use crate::modes::PlayModes;
use rand::Rng;

/// Result of a "previous" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewind {
    /// Index to play
    pub index: usize,

    /// History to adopt once the track changes
    pub history: History,
}

/// Pick the index that follows `current`
///
/// - repeat: `current` again (repeat-one)
/// - shuffle: uniform random index other than `current`
/// - otherwise: `current + 1`, wrapping to 0
pub fn next_index<R: Rng + ?Sized>(
    queue_len: usize,
    current: usize,
    modes: PlayModes,
    rng: &mut R,
) -> Option<usize> {
    if queue_len == 0 {
        return None;
    }
    let current = current.min(queue_len - 1);

    let index = if modes.repeat() {
        current
    } else if modes.shuffle() {
        random_other(queue_len, current, rng)
    } else {
        (current + 1) % queue_len
    };

    Some(index)
}

/// Pick the index to rewind to
///
/// Steps back through `history` when it holds an entry earlier than the
/// current one. Otherwise falls back to a random other track and starts a
/// new history seeded with it.
pub fn previous_index<R: Rng + ?Sized>(
    history: &History,
    queue_len: usize,
    current: usize,
    rng: &mut R,
) -> Option<Rewind> {
    if queue_len == 0 {
        return None;
    }

    if let Some((index, history)) = history.step_back() {
        if index < queue_len {
            return Some(Rewind { index, history });
        }
    }

    let index = random_other(queue_len, current.min(queue_len - 1), rng);
    Some(Rewind {
        index,
        history: History::seeded(index, history.limit()),
    })
}

/// Uniform random index in `[0, queue_len)` excluding `current`
///
/// Re-rolls on collision. With a single track, returns `current`.
pub fn random_other<R: Rng + ?Sized>(queue_len: usize, current: usize, rng: &mut R) -> usize {
    if queue_len <= 1 {
        return current;
    }

    loop {
        let candidate = rng.gen_range(0..queue_len);
        if candidate != current {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModeChange;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn linear() -> PlayModes {
        PlayModes::default()
    }

    fn shuffled() -> PlayModes {
        PlayModes::default().apply(ModeChange::SetShuffle(true))
    }

    fn repeating() -> PlayModes {
        PlayModes::default().apply(ModeChange::SetRepeat(true))
    }

    #[test]
    fn next_wraps_at_end() {
        let mut rng = rng();
        assert_eq!(next_index(3, 0, linear(), &mut rng), Some(1));
        assert_eq!(next_index(3, 1, linear(), &mut rng), Some(2));
        assert_eq!(next_index(3, 2, linear(), &mut rng), Some(0));
    }

    #[test]
    fn next_repeat_returns_current() {
        assert_eq!(next_index(5, 3, repeating(), &mut rng()), Some(3));
    }

    #[test]
    fn next_shuffle_never_returns_current() {
        let mut rng = rng();
        for _ in 0..500 {
            let next = next_index(4, 2, shuffled(), &mut rng).unwrap();
            assert_ne!(next, 2);
            assert!(next < 4);
        }
    }

    #[test]
    fn next_shuffle_reaches_every_other_index() {
        let mut rng = rng();
        let seen: HashSet<usize> = (0..500)
            .filter_map(|_| next_index(5, 0, shuffled(), &mut rng))
            .collect();
        assert_eq!(seen, (1..5).collect());
    }

    #[test]
    fn single_track_queue_returns_same_index() {
        let mut rng = rng();
        assert_eq!(next_index(1, 0, linear(), &mut rng), Some(0));
        assert_eq!(next_index(1, 0, shuffled(), &mut rng), Some(0));

        let rewind = previous_index(&History::seeded(0, 10), 1, 0, &mut rng).unwrap();
        assert_eq!(rewind.index, 0);
        assert_eq!(rewind.history.top(), Some(0));
    }

    #[test]
    fn empty_queue_selects_nothing() {
        let mut rng = rng();
        assert_eq!(next_index(0, 0, linear(), &mut rng), None);
        assert_eq!(previous_index(&History::default(), 0, 0, &mut rng), None);
    }

    #[test]
    fn previous_walks_history() {
        let history = History::new(10).push(0).push(3).push(1);
        let rewind = previous_index(&history, 5, 1, &mut rng()).unwrap();

        assert_eq!(rewind.index, 3);
        assert_eq!(rewind.history.entries().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn previous_without_history_picks_random_other() {
        let mut rng = rng();
        for _ in 0..100 {
            let rewind = previous_index(&History::seeded(2, 10), 4, 2, &mut rng).unwrap();
            assert_ne!(rewind.index, 2);
            assert_eq!(rewind.history.len(), 1);
            assert_eq!(rewind.history.top(), Some(rewind.index));
        }
    }

    #[test]
    fn previous_ignores_entries_beyond_queue() {
        let history = History::new(10).push(8).push(1);
        let rewind = previous_index(&history, 3, 1, &mut rng()).unwrap();
        assert_ne!(rewind.index, 1);
        assert!(rewind.index < 3);
    }
}
