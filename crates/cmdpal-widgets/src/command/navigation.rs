#![forbid(unsafe_code)]

//! Selection movement.
//!
//! Navigation walks *valid* items (rendered and not disabled) in
//! presentation order and always selects through [`Store::set_value`], so
//! controlled roots see every move as an `on_value_change` candidate.
//!
//! # Invariants
//!
//! 1. Moves never select a disabled or filtered-out item.
//! 2. Without loop mode, moving past either end does nothing.
//! 3. With loop mode, moving past an end wraps to the other end.
//! 4. With nothing selected, "next" selects the first valid item and
//!    "previous" selects nothing (the last item in loop mode).

use cmdpal_core::NodeId;

use super::state::State;
use super::store::Store;
use super::view::{ItemNode, PresentationOrder, ScrollTarget};

/// Direction of a relative move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    const fn delta(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

pub(crate) fn item_rendered(
    state: &State,
    should_filter: bool,
    id: NodeId,
    node: &ItemNode,
) -> bool {
    node.force_mount
        || !should_filter
        || state.search.is_empty()
        || state.filtered.score(id) > 0.0
}

pub(crate) fn group_rendered(
    state: &State,
    should_filter: bool,
    id: NodeId,
    force_mount: bool,
) -> bool {
    force_mount || !should_filter || state.search.is_empty() || state.filtered.groups.contains(&id)
}

impl Store {
    /// Whether the item is currently rendered.
    #[must_use]
    pub fn is_item_rendered(&self, id: NodeId) -> bool {
        let should_filter = self.should_filter();
        let state = self.inner.state.borrow();
        self.inner
            .view
            .borrow()
            .item(id)
            .is_some_and(|node| item_rendered(&state, should_filter, id, node))
    }

    /// Whether the group is currently rendered (not hidden).
    #[must_use]
    pub fn is_group_rendered(&self, id: NodeId) -> bool {
        let should_filter = self.should_filter();
        let state = self.inner.state.borrow();
        self.inner
            .view
            .borrow()
            .group(id)
            .is_some_and(|node| group_rendered(&state, should_filter, id, node.force_mount))
    }

    /// Valid items in presentation order.
    #[must_use]
    pub fn valid_items(&self) -> Vec<NodeId> {
        self.valid_entries().into_iter().map(|(id, _)| id).collect()
    }

    fn valid_entries(&self) -> Vec<(NodeId, String)> {
        let should_filter = self.should_filter();
        let state = self.inner.state.borrow();
        let view = self.inner.view.borrow();
        view.item_order()
            .into_iter()
            .filter_map(|id| {
                let node = view.item(id)?;
                (!node.disabled && item_rendered(&state, should_filter, id, node))
                    .then(|| (id, node.value.clone()))
            })
            .collect()
    }

    /// The first rendered item whose value is the selected value.
    #[must_use]
    pub fn selected_item(&self) -> Option<NodeId> {
        let should_filter = self.should_filter();
        let state = self.inner.state.borrow();
        if state.value.is_empty() {
            return None;
        }
        let view = self.inner.view.borrow();
        view.item_order().into_iter().find(|id| {
            view.item(*id).is_some_and(|node| {
                node.value == state.value && item_rendered(&state, should_filter, *id, node)
            })
        })
    }

    /// Select the first valid item, or clear the selection if there is none.
    pub fn select_first(&self) {
        let value = self
            .valid_entries()
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .unwrap_or_default();
        #[cfg(feature = "tracing")]
        tracing::debug!(value = %value, "select first");
        self.set_value(value);
    }

    /// Select the valid item at `index`; out of range does nothing.
    pub fn move_to_index(&self, index: usize) {
        if let Some((_, value)) = self.valid_entries().into_iter().nth(index) {
            self.set_value(value);
        }
    }

    /// Select the last valid item.
    pub fn select_last(&self) {
        let mut entries = self.valid_entries();
        if let Some((_, value)) = entries.pop() {
            self.set_value(value);
        }
    }

    /// Move one valid item in `direction`.
    pub fn move_by_item(&self, direction: Direction) {
        let entries = self.valid_entries();
        let selected = self.selected_item();
        let index = selected
            .and_then(|s| entries.iter().position(|(id, _)| *id == s))
            .map_or(-1, |i| i as isize);
        let target = index + direction.delta();
        let len = entries.len() as isize;
        let pick = if self.inner.config.borrow().loop_navigation {
            if target < 0 {
                entries.last()
            } else if target == len {
                entries.first()
            } else {
                entries.get(target as usize)
            }
        } else if target >= 0 {
            entries.get(target as usize)
        } else {
            None
        };
        if let Some((_, value)) = pick {
            self.set_value(value.clone());
        }
    }

    /// Jump to the first valid item of the nearest sibling group in
    /// `direction` that has one; falls back to [`Store::move_by_item`].
    pub fn move_by_group(&self, direction: Direction) {
        match self.sibling_group_target(direction) {
            Some(value) => self.set_value(value),
            None => self.move_by_item(direction),
        }
    }

    fn sibling_group_target(&self, direction: Direction) -> Option<String> {
        let selected = self.selected_item()?;
        let valid = self.valid_entries();
        let view = self.inner.view.borrow();
        let current = view.item(selected)?.group?;
        let groups = view.group_order();
        let mut pos = groups.iter().position(|g| *g == current)?;
        loop {
            pos = match direction {
                Direction::Next if pos + 1 < groups.len() => pos + 1,
                Direction::Prev if pos > 0 => pos - 1,
                _ => return None,
            };
            let members = view.group(groups[pos]).map(|g| g.items.as_slice()).unwrap_or_default();
            let hit = members
                .iter()
                .find_map(|m| valid.iter().find(|(id, _)| id == m));
            if let Some((_, value)) = hit {
                return Some(value.clone());
            }
        }
    }

    /// Scroll the selected item into view, preceded by its group heading
    /// when it is the first item of its group.
    pub(crate) fn scroll_selected_into_view(&self) {
        let Some(selected) = self.selected_item() else {
            return;
        };
        let mut targets = Vec::with_capacity(2);
        {
            let view = self.inner.view.borrow();
            if view.is_first_in_group(selected) {
                let heading = view
                    .item(selected)
                    .and_then(|n| n.group)
                    .and_then(|g| view.group(g))
                    .filter(|g| g.heading.is_some())
                    .map(|g| g.heading_id);
                if let Some(heading) = heading {
                    targets.push(ScrollTarget::GroupHeading(heading));
                }
            }
        }
        targets.push(ScrollTarget::Item(selected));
        for target in targets {
            self.inner.view.borrow_mut().scroll_into_view(target);
            if let Some(host) = self.inner.host.borrow_mut().as_deref_mut() {
                host.scroll_into_view(target);
            }
        }
    }
}
