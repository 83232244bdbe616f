#![forbid(unsafe_code)]

//! Filtering.
//!
//! Scores every registered item against the current search and derives the
//! [`Filtered`](super::Filtered) summary.
//!
//! # Invariants
//!
//! 1. With an empty search or filtering disabled, `count` is the number of
//!    registered items and stored scores are left alone.
//! 2. Otherwise `count` is the number of items scoring above zero and a
//!    group is visible iff one of its members scores above zero.
//! 3. An empty display value scores zero without calling the scorer.
//!
//! # Failure Modes
//!
//! - The scoring function runs with the registry borrowed. A scorer that
//!   mounts or unmounts nodes panics on the `RefCell`.

use ahash::{AHashMap, AHashSet};
use cmdpal_core::{FilterFn, NodeId};

use super::store::Store;

impl Store {
    /// Score `value` against the current search.
    #[must_use]
    pub fn score(&self, value: &str, keywords: &[String]) -> f64 {
        if value.is_empty() {
            return 0.0;
        }
        let filter = self.filter_fn();
        let search = self.inner.state.borrow().search.clone();
        filter(value, &search, keywords)
    }

    /// Recompute `filtered` from the registry and the current search.
    pub(crate) fn filter_items(&self) {
        let search = self.inner.state.borrow().search.clone();
        if search.is_empty() || !self.should_filter() {
            let count = self.inner.registry.borrow().item_count();
            self.inner.state.borrow_mut().filtered.count = count;
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("cmdpal.filter", search = %search).entered();

        let filter = self.filter_fn();
        let (scores, groups) = {
            let registry = self.inner.registry.borrow();
            let scores = score_all(&filter, &search, &registry);
            let groups: AHashSet<NodeId> = registry
                .groups()
                .filter(|(_, members)| {
                    members
                        .iter()
                        .any(|m| scores.get(m).is_some_and(|s| *s > 0.0))
                })
                .map(|(id, _)| id)
                .collect();
            (scores, groups)
        };

        let count = scores.values().filter(|s| **s > 0.0).count();
        #[cfg(feature = "tracing")]
        tracing::debug!(count, groups = groups.len(), "filtered");

        let mut state = self.inner.state.borrow_mut();
        state.filtered.items.extend(scores);
        state.filtered.groups = groups;
        state.filtered.count = count;
    }
}

fn score_all(
    filter: &FilterFn,
    search: &str,
    registry: &super::context::Registry,
) -> AHashMap<NodeId, f64> {
    registry
        .items()
        .map(|id| {
            let rank = match registry.value(id) {
                Some(entry) if !entry.value.is_empty() => {
                    filter(&entry.value, search, &entry.keywords)
                }
                _ => 0.0,
            };
            (id, rank)
        })
        .collect()
}
