#![forbid(unsafe_code)]

//! Store state and update types.

use ahash::{AHashMap, AHashSet};
use cmdpal_core::NodeId;

/// Per-root palette state.
///
/// Only [`Store::set_state`](super::Store::set_state) and the registration
/// API mutate it; everything else reads a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Current query text.
    pub search: String,
    /// Display value of the selected item; empty means nothing is selected.
    pub value: String,
    pub filtered: Filtered,
}

/// Derived filter summary, recomputed before any subscriber sees a change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered {
    /// Items with a positive score while filtering is active; otherwise the
    /// number of registered items.
    pub count: usize,
    /// Last computed score per node.
    pub items: AHashMap<NodeId, f64>,
    /// Groups with at least one passing item.
    pub groups: AHashSet<NodeId>,
}

impl Filtered {
    /// Score of `id`, `0.0` if it was never scored.
    #[must_use]
    pub fn score(&self, id: NodeId) -> f64 {
        self.items.get(&id).copied().unwrap_or(0.0)
    }
}

/// A write to one of the two host-settable state keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    Search(String),
    Value(String),
}

/// Options for [`Store::set_state`](super::Store::set_state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Do not scroll the new selection into view (pointer selection, confirm).
    pub silent: bool,
}

impl SetOptions {
    pub const SILENT: Self = Self { silent: true };
}

/// Scheduler slots. Each names one deferred side effect; requests for the
/// same slot within a turn collapse into one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Select the first valid item after the search changed.
    SelectFirst,
    /// Re-sort and emit after an item's display value changed.
    ValueChanged,
    /// Re-filter, re-sort, and select if nothing is selected, after mounts.
    ItemMounted,
    /// Re-filter and reselect if the selection went away, after unmounts.
    ItemUnmounted,
    /// Scroll the selection into view after a non-silent value change.
    ScrollSelected,
    /// Scroll the initial selection into view once the first items mount.
    InitialScroll,
}
