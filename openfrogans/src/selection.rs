//! Server selection policies.
//!
//! Every step that picks one server out of several candidates (seed hosts,
//! naming servers, site content servers) goes through a [`ServerSelector`].
//! Selection is per call: nothing is pinned between calls.
//!
//! # Policies
//!
//! - [`RandomSelector`]: uniform random choice (default)
//! - [`RoundRobinSelector`]: rotates through candidates in order
//!
//! # Example
//!
//! ```
//! use openfrogans::selection::{SelectionStrategy, ServerSelector};
//!
//! let selector = SelectionStrategy::RoundRobin.build();
//! assert_eq!(selector.select(3), Some(0));
//! assert_eq!(selector.select(3), Some(1));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;

/// Picks one index out of `candidates` servers.
pub trait ServerSelector: Send + Sync + fmt::Debug {
    /// Returns the index of the chosen candidate, or `None` if there are none.
    fn select(&self, candidates: usize) -> Option<usize>;

    /// Returns up to `attempts` distinct indices, starting with [`select`](Self::select)
    /// and continuing in list order.
    ///
    /// An out-of-range first pick wraps around the candidate list.
    fn select_sequence(&self, candidates: usize, attempts: usize) -> Vec<usize> {
        if candidates == 0 {
            return Vec::new();
        }
        match self.select(candidates) {
            Some(first) => {
                let first = first % candidates;
                (0..attempts.clamp(1, candidates))
                    .map(|offset| (first + offset) % candidates)
                    .collect()
            }
            None => Vec::new(),
        }
    }
}

/// Uniform random selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl ServerSelector for RandomSelector {
    fn select(&self, candidates: usize) -> Option<usize> {
        if candidates == 0 {
            return None;
        }
        Some(rand::rng().random_range(0..candidates))
    }
}

/// Rotating selection.
///
/// The cursor is shared across all candidate lists passed to this selector.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    cursor: AtomicUsize,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServerSelector for RoundRobinSelector {
    fn select(&self, candidates: usize) -> Option<usize> {
        if candidates == 0 {
            return None;
        }
        Some(self.cursor.fetch_add(1, Ordering::Relaxed) % candidates)
    }
}

/// Configurable choice of selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    /// Uniform random choice on every call.
    #[default]
    Random,
    /// Rotate through candidates.
    RoundRobin,
}

impl SelectionStrategy {
    /// Builds a fresh selector for this strategy.
    pub fn build(self) -> Arc<dyn ServerSelector> {
        match self {
            Self::Random => Arc::new(RandomSelector),
            Self::RoundRobin => Arc::new(RoundRobinSelector::new()),
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::RoundRobin => write!(f, "round-robin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_selector_empty() {
        assert_eq!(RandomSelector.select(0), None);
    }

    #[test]
    fn test_random_selector_in_range() {
        for _ in 0..100 {
            let index = RandomSelector.select(3).unwrap();
            assert!(index < 3);
        }
    }

    #[test]
    fn test_random_selector_single_candidate() {
        assert_eq!(RandomSelector.select(1), Some(0));
    }

    #[test]
    fn test_round_robin_wraps() {
        let selector = RoundRobinSelector::new();
        let picks: Vec<_> = (0..5).map(|_| selector.select(2).unwrap()).collect();
        assert_eq!(picks, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_select_sequence_is_distinct_and_bounded() {
        let selector = RoundRobinSelector::new();
        assert_eq!(selector.select_sequence(3, 5), vec![0, 1, 2]);
        assert_eq!(selector.select_sequence(3, 2), vec![1, 2]);
    }

    #[test]
    fn test_select_sequence_single_attempt() {
        let sequence = RandomSelector.select_sequence(4, 1);
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn test_select_sequence_zero_attempts_still_tries_once() {
        assert_eq!(RoundRobinSelector::new().select_sequence(2, 0), vec![0]);
    }

    #[test]
    fn test_select_sequence_empty() {
        assert!(RandomSelector.select_sequence(0, 3).is_empty());
    }

    /// Always answers the same index, whatever the candidate count.
    #[derive(Debug)]
    struct FixedSelector(usize);

    impl ServerSelector for FixedSelector {
        fn select(&self, _candidates: usize) -> Option<usize> {
            Some(self.0)
        }
    }

    #[test]
    fn test_select_sequence_ignores_pick_without_candidates() {
        assert!(FixedSelector(0).select_sequence(0, 1).is_empty());
        assert!(FixedSelector(5).select_sequence(0, 3).is_empty());
    }

    #[test]
    fn test_select_sequence_wraps_out_of_range_pick() {
        assert_eq!(FixedSelector(7).select_sequence(3, 2), vec![1, 2]);
        assert_eq!(FixedSelector(usize::MAX).select_sequence(2, 2).len(), 2);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(SelectionStrategy::default().to_string(), "random");
        assert_eq!(SelectionStrategy::RoundRobin.to_string(), "round-robin");
    }
}
