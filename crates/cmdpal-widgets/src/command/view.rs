#![forbid(unsafe_code)]

//! Presentation order.
//!
//! The engine never owns host nodes. It reorders them through the
//! [`PresentationOrder`] capability and keeps its own copy of the order in
//! a [`ViewModel`], which navigation walks and [`List`](super::List)
//! renders.
//!
//! # Invariants
//!
//! 1. Every mounted item appears exactly once: either as a top-level
//!    [`Entry::Item`] or in the `items` of exactly one group.
//! 2. `append_*` only moves nodes that are already mounted; unknown ids are
//!    ignored.
//! 3. The scroll log keeps at most [`SCROLL_LOG_CAPACITY`] entries, dropping
//!    the oldest.

use std::collections::VecDeque;

use ahash::AHashMap;
use cmdpal_core::NodeId;

use super::config::ValueCallback;

/// Number of scroll requests the view model remembers.
pub const SCROLL_LOG_CAPACITY: usize = 64;

/// A node the engine wants brought into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    /// A group heading (by heading id), scrolled before the group's first
    /// item.
    GroupHeading(NodeId),
    Item(NodeId),
}

/// Host capability for reordering sibling nodes.
///
/// Sorting appends each node to the end of its current container, in
/// score order, so after a pass the containers read best-first.
pub trait PresentationOrder {
    /// Move `item` to the end of its container: `group`'s items if it has
    /// one, the list otherwise.
    fn append_item(&mut self, item: NodeId, group: Option<NodeId>);

    /// Move `group` to the end of the list.
    fn append_group(&mut self, group: NodeId);

    /// Bring `target` into view with minimal scrolling.
    fn scroll_into_view(&mut self, _target: ScrollTarget) {}
}

/// A top-level node of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Item(NodeId),
    Group(NodeId),
    Separator(NodeId),
}

/// Presentation data for a mounted item.
#[derive(Clone)]
pub struct ItemNode {
    pub group: Option<NodeId>,
    /// Registered display value (also the `data-value` attribute).
    pub value: String,
    pub text: Option<String>,
    pub disabled: bool,
    /// Resolved force-mount flag (the item's own, else its group's).
    pub force_mount: bool,
    pub on_select: Option<ValueCallback>,
}

impl std::fmt::Debug for ItemNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemNode")
            .field("group", &self.group)
            .field("value", &self.value)
            .field("text", &self.text)
            .field("disabled", &self.disabled)
            .field("force_mount", &self.force_mount)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

/// Presentation data for a mounted group.
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub value: String,
    pub heading: Option<String>,
    pub heading_id: NodeId,
    pub force_mount: bool,
    /// Member items in presentation order.
    pub items: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
pub struct SeparatorNode {
    pub always_render: bool,
}

/// The engine's copy of the presentation order.
#[derive(Debug, Default)]
pub struct ViewModel {
    entries: Vec<Entry>,
    items: AHashMap<NodeId, ItemNode>,
    groups: AHashMap<NodeId, GroupNode>,
    separators: AHashMap<NodeId, SeparatorNode>,
    scroll_log: VecDeque<ScrollTarget>,
}

impl ViewModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level entries in presentation order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn item(&self, id: NodeId) -> Option<&ItemNode> {
        self.items.get(&id)
    }

    pub(crate) fn item_mut(&mut self, id: NodeId) -> Option<&mut ItemNode> {
        self.items.get_mut(&id)
    }

    #[must_use]
    pub fn group(&self, id: NodeId) -> Option<&GroupNode> {
        self.groups.get(&id)
    }

    pub(crate) fn group_mut(&mut self, id: NodeId) -> Option<&mut GroupNode> {
        self.groups.get_mut(&id)
    }

    #[must_use]
    pub fn separator(&self, id: NodeId) -> Option<&SeparatorNode> {
        self.separators.get(&id)
    }

    /// Mount `node` at the end of its container. Mounting an id twice
    /// replaces the node data and keeps its position.
    pub(crate) fn mount_item(&mut self, id: NodeId, node: ItemNode) {
        let group = node.group;
        if self.items.insert(id, node).is_some() {
            return;
        }
        match group.and_then(|g| self.groups.get_mut(&g)) {
            Some(g) => g.items.push(id),
            None => self.entries.push(Entry::Item(id)),
        }
    }

    pub(crate) fn unmount_item(&mut self, id: NodeId) -> Option<ItemNode> {
        let node = self.items.remove(&id)?;
        if let Some(g) = node.group.and_then(|g| self.groups.get_mut(&g)) {
            g.items.retain(|i| *i != id);
        }
        self.entries.retain(|e| *e != Entry::Item(id));
        Some(node)
    }

    pub(crate) fn mount_group(&mut self, id: NodeId, node: GroupNode) {
        if self.groups.insert(id, node).is_none() {
            self.entries.push(Entry::Group(id));
        }
    }

    /// Unmount a group together with its member items. Returns the members
    /// that were still mounted.
    pub(crate) fn unmount_group(&mut self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.groups.remove(&id) else {
            return Vec::new();
        };
        self.entries.retain(|e| *e != Entry::Group(id));
        for item in &node.items {
            self.items.remove(item);
        }
        node.items
    }

    pub(crate) fn mount_separator(&mut self, id: NodeId, node: SeparatorNode) {
        if self.separators.insert(id, node).is_none() {
            self.entries.push(Entry::Separator(id));
        }
    }

    pub(crate) fn unmount_separator(&mut self, id: NodeId) {
        if self.separators.remove(&id).is_some() {
            self.entries.retain(|e| *e != Entry::Separator(id));
        }
    }

    /// Every mounted item in presentation order, groups flattened in place.
    #[must_use]
    pub fn item_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.items.len());
        for entry in &self.entries {
            match *entry {
                Entry::Item(id) => out.push(id),
                Entry::Group(g) => {
                    if let Some(node) = self.groups.get(&g) {
                        out.extend_from_slice(&node.items);
                    }
                }
                Entry::Separator(_) => {}
            }
        }
        out
    }

    /// Mounted groups in presentation order.
    #[must_use]
    pub fn group_order(&self) -> Vec<NodeId> {
        self.entries
            .iter()
            .filter_map(|e| match *e {
                Entry::Group(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    /// Whether `item` is the first child of its group's items container.
    #[must_use]
    pub fn is_first_in_group(&self, item: NodeId) -> bool {
        self.items
            .get(&item)
            .and_then(|n| n.group)
            .and_then(|g| self.groups.get(&g))
            .is_some_and(|g| g.items.first() == Some(&item))
    }

    /// Drain the recorded scroll requests, oldest first.
    pub fn take_scroll_log(&mut self) -> Vec<ScrollTarget> {
        self.scroll_log.drain(..).collect()
    }
}

impl PresentationOrder for ViewModel {
    fn append_item(&mut self, item: NodeId, group: Option<NodeId>) {
        if let Some(node) = group.and_then(|g| self.groups.get_mut(&g)) {
            if let Some(pos) = node.items.iter().position(|i| *i == item) {
                let id = node.items.remove(pos);
                node.items.push(id);
            }
            return;
        }
        if let Some(pos) = self.entries.iter().position(|e| *e == Entry::Item(item)) {
            let entry = self.entries.remove(pos);
            self.entries.push(entry);
        }
    }

    fn append_group(&mut self, group: NodeId) {
        if let Some(pos) = self.entries.iter().position(|e| *e == Entry::Group(group)) {
            let entry = self.entries.remove(pos);
            self.entries.push(entry);
        }
    }

    fn scroll_into_view(&mut self, target: ScrollTarget) {
        if self.scroll_log.len() == SCROLL_LOG_CAPACITY {
            self.scroll_log.pop_front();
        }
        self.scroll_log.push_back(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdpal_core::IdAllocator;

    fn item(group: Option<NodeId>, value: &str) -> ItemNode {
        ItemNode {
            group,
            value: value.to_owned(),
            text: None,
            disabled: false,
            force_mount: false,
            on_select: None,
        }
    }

    fn group(heading_id: NodeId) -> GroupNode {
        GroupNode {
            value: String::new(),
            heading: None,
            heading_id,
            force_mount: false,
            items: Vec::new(),
        }
    }

    #[test]
    fn items_flatten_through_groups() {
        let ids = IdAllocator::new();
        let (a, g, b, c) = (ids.next_id(), ids.next_id(), ids.next_id(), ids.next_id());
        let mut view = ViewModel::new();
        view.mount_item(a, item(None, "a"));
        view.mount_group(g, group(ids.next_id()));
        view.mount_item(b, item(Some(g), "b"));
        view.mount_item(c, item(Some(g), "c"));
        assert_eq!(view.item_order(), vec![a, b, c]);
        assert_eq!(view.group_order(), vec![g]);
        assert!(view.is_first_in_group(b));
        assert!(!view.is_first_in_group(c));
        assert!(!view.is_first_in_group(a));
    }

    #[test]
    fn append_moves_within_container() {
        let ids = IdAllocator::new();
        let (g, b, c) = (ids.next_id(), ids.next_id(), ids.next_id());
        let mut view = ViewModel::new();
        let a = ids.next_id();
        view.mount_group(g, group(ids.next_id()));
        view.mount_item(b, item(Some(g), "b"));
        view.mount_item(c, item(Some(g), "c"));
        view.mount_item(a, item(None, "a"));
        view.append_item(b, Some(g));
        view.append_group(g);
        assert_eq!(view.item_order(), vec![a, c, b]);
        assert_eq!(view.entries(), &[Entry::Item(a), Entry::Group(g)]);
    }

    #[test]
    fn append_ignores_unknown_ids() {
        let ids = IdAllocator::new();
        let a = ids.next_id();
        let mut view = ViewModel::new();
        view.mount_item(a, item(None, "a"));
        view.append_item(ids.next_id(), None);
        view.append_group(ids.next_id());
        assert_eq!(view.item_order(), vec![a]);
    }

    #[test]
    fn unmount_group_takes_members() {
        let ids = IdAllocator::new();
        let (g, b) = (ids.next_id(), ids.next_id());
        let mut view = ViewModel::new();
        view.mount_group(g, group(ids.next_id()));
        view.mount_item(b, item(Some(g), "b"));
        assert_eq!(view.unmount_group(g), vec![b]);
        assert!(view.item(b).is_none());
        assert!(view.entries().is_empty());
        assert!(view.unmount_group(g).is_empty());
    }

    #[test]
    fn remount_keeps_position() {
        let ids = IdAllocator::new();
        let (a, b) = (ids.next_id(), ids.next_id());
        let mut view = ViewModel::new();
        view.mount_item(a, item(None, "a"));
        view.mount_item(b, item(None, "b"));
        view.mount_item(a, item(None, "a2"));
        assert_eq!(view.item_order(), vec![a, b]);
        assert_eq!(view.item(a).map(|n| n.value.as_str()), Some("a2"));
    }

    #[test]
    fn scroll_log_is_bounded() {
        let ids = IdAllocator::new();
        let mut view = ViewModel::new();
        let first = ids.next_id();
        view.scroll_into_view(ScrollTarget::Item(first));
        for _ in 0..SCROLL_LOG_CAPACITY {
            view.scroll_into_view(ScrollTarget::Item(ids.next_id()));
        }
        let log = view.take_scroll_log();
        assert_eq!(log.len(), SCROLL_LOG_CAPACITY);
        assert!(!log.contains(&ScrollTarget::Item(first)));
        assert!(view.take_scroll_log().is_empty());
    }
}
