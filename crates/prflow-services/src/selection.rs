//! Random reviewer selection
//!
//! Randomness is injected through [`RandomSource`] so callers decide between the thread-local
//! generator and a scripted sequence.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;

/// Source of uniform indices
pub trait RandomSource: Send + Sync {
    /// Index in `0..bound`. Callers never pass a zero bound.
    fn index(&self, bound: usize) -> usize;
}

/// Thread-local `rand` generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

/// Replays a fixed list of picks, each reduced modulo the requested bound.
/// Yields 0 once the list is exhausted.
///
/// For deterministic tests only; the service wires [`ThreadRandom`].
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    picks: Mutex<VecDeque<usize>>,
}

impl ScriptedRandom {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: Mutex::new(picks.into_iter().collect()),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&self, bound: usize) -> usize {
        let next = self
            .picks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(0);
        next % bound
    }
}

/// Up to `count` distinct items, uniformly without replacement (partial Fisher-Yates).
/// Returns every item when the pool is not larger than `count`.
pub fn choose_distinct<T: Clone>(pool: &[T], count: usize, random: &dyn RandomSource) -> Vec<T> {
    let mut items = pool.to_vec();
    let take = count.min(items.len());

    for i in 0..take {
        let j = i + random.index(items.len() - i);
        items.swap(i, j);
    }

    items.truncate(take);
    items
}

/// One item chosen uniformly, `None` for an empty pool
pub fn choose_one<T: Clone>(pool: &[T], random: &dyn RandomSource) -> Option<T> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[random.index(pool.len())].clone())
}
