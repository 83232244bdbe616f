#![forbid(unsafe_code)]

//! Item and group registry.
//!
//! Mounting an item registers it with its root; the returned
//! [`ItemRegistration`] unregisters it on drop. The registry is what the
//! filter scores, while the view model is what navigation walks.
//!
//! # Invariants
//!
//! 1. An item id is in at most one group's member set.
//! 2. Registering an id twice is a no-op; the second registration is inert.
//! 3. Unregistering an unknown id is a silent no-op.
//! 4. Dropping a group registration removes its member items as well.
//! 5. Removing the selected item makes the next unmount flush reselect.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use cmdpal_core::NodeId;

use super::state::Slot;
use super::store::{Store, WeakStore};

/// Registered display value and keyword aliases of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueEntry {
    pub value: String,
    pub keywords: Vec<String>,
}

/// Bookkeeping for every registered item and group of one root.
#[derive(Debug, Default)]
pub struct Registry {
    all_items: AHashSet<NodeId>,
    all_groups: AHashMap<NodeId, AHashSet<NodeId>>,
    ids: AHashMap<NodeId, ValueEntry>,
}

impl Registry {
    #[must_use]
    pub fn contains_item(&self, id: NodeId) -> bool {
        self.all_items.contains(&id)
    }

    #[must_use]
    pub fn contains_group(&self, id: NodeId) -> bool {
        self.all_groups.contains_key(&id)
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.all_items.len()
    }

    pub fn items(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.all_items.iter().copied()
    }

    pub fn groups(&self) -> impl Iterator<Item = (NodeId, &AHashSet<NodeId>)> + '_ {
        self.all_groups.iter().map(|(id, members)| (*id, members))
    }

    #[must_use]
    pub fn members(&self, group: NodeId) -> Option<&AHashSet<NodeId>> {
        self.all_groups.get(&group)
    }

    /// Registered value of an item or group.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&ValueEntry> {
        self.ids.get(&id)
    }
}

impl Store {
    /// Register a mounted item, optionally as a member of `group`.
    ///
    /// At the end of the turn the root re-filters, re-sorts, and selects the
    /// first valid item if nothing is selected.
    pub fn register_item(&self, id: NodeId, group: Option<NodeId>) -> ItemRegistration {
        let _turn = self.begin_turn();
        {
            let mut registry = self.inner.registry.borrow_mut();
            if !registry.all_items.insert(id) {
                return ItemRegistration::inert(self, id);
            }
            if let Some(group) = group {
                registry.all_groups.entry(group).or_default().insert(id);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(item = %id, group = ?group, "item registered");
        self.schedule(Slot::ItemMounted, |store| {
            store.filter_items();
            store.sort();
            if store.snapshot().value.is_empty() {
                store.select_first();
            }
            store.emit();
            if store.inner.initial_scroll_pending.replace(false) {
                store.schedule(Slot::InitialScroll, Store::scroll_selected_into_view);
            }
        });
        ItemRegistration {
            store: self.downgrade(),
            id,
            active: true,
        }
    }

    /// Remove an item from the registry. Unknown ids are ignored.
    pub(crate) fn unregister_item(&self, id: NodeId) {
        let _turn = self.begin_turn();
        if !self.inner.registry.borrow().contains_item(id) {
            return;
        }
        if self.selected_item() == Some(id) {
            self.inner.reselect_pending.set(true);
        }
        {
            let mut registry = self.inner.registry.borrow_mut();
            registry.all_items.remove(&id);
            registry.ids.remove(&id);
            for members in registry.all_groups.values_mut() {
                members.remove(&id);
            }
        }
        self.inner.state.borrow_mut().filtered.items.remove(&id);
        #[cfg(feature = "tracing")]
        tracing::debug!(item = %id, "item unregistered");
        self.schedule_unmount_flush();
    }

    /// Register a mounted group.
    pub fn register_group(&self, id: NodeId) -> GroupRegistration {
        let _turn = self.begin_turn();
        let fresh = {
            let mut registry = self.inner.registry.borrow_mut();
            let fresh = !registry.all_groups.contains_key(&id);
            registry.all_groups.entry(id).or_default();
            fresh
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(group = %id, fresh, "group registered");
        GroupRegistration {
            store: self.downgrade(),
            id,
            active: fresh,
        }
    }

    /// Remove a group and every item still registered as its member.
    ///
    /// Force-mounted members are never registered; they are found through
    /// the view and their cached values dropped as well.
    pub(crate) fn unregister_group(&self, id: NodeId) {
        let _turn = self.begin_turn();
        let Some(members) = self.inner.registry.borrow().members(id).cloned() else {
            return;
        };
        let mounted: Vec<NodeId> = self
            .inner
            .view
            .borrow()
            .group(id)
            .map(|g| g.items.clone())
            .unwrap_or_default();
        if self
            .selected_item()
            .is_some_and(|selected| members.contains(&selected) || mounted.contains(&selected))
        {
            self.inner.reselect_pending.set(true);
        }
        {
            let mut registry = self.inner.registry.borrow_mut();
            registry.all_groups.remove(&id);
            registry.ids.remove(&id);
            for member in members.iter().chain(&mounted) {
                registry.all_items.remove(member);
                registry.ids.remove(member);
            }
        }
        {
            let mut state = self.inner.state.borrow_mut();
            state.filtered.groups.remove(&id);
            for member in members.iter().chain(&mounted) {
                state.filtered.items.remove(member);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(group = %id, members = members.len(), "group unregistered");
        if !members.is_empty() || self.inner.reselect_pending.get() {
            self.schedule_unmount_flush();
        }
    }

    /// Drop the cached value of an item that was never registered (a
    /// force-mounted item) and reselect if it held the selection. Call
    /// before the item leaves the view.
    pub(crate) fn release_unregistered_item(&self, id: NodeId) {
        let _turn = self.begin_turn();
        let selected = self.selected_item() == Some(id);
        let cached = self.inner.registry.borrow_mut().ids.remove(&id).is_some();
        let scored = self.inner.state.borrow_mut().filtered.items.remove(&id).is_some();
        if selected {
            self.inner.reselect_pending.set(true);
        }
        if selected || cached || scored {
            self.schedule_unmount_flush();
        }
    }

    fn schedule_unmount_flush(&self) {
        self.schedule(Slot::ItemUnmounted, |store| {
            store.filter_items();
            if store.inner.reselect_pending.replace(false) {
                store.select_first();
            }
            store.emit();
        });
    }

    /// Record the display value and keywords of an item or group.
    ///
    /// A changed value is re-scored immediately; the re-sort and
    /// notification happen at the end of the turn. Ids that are neither
    /// registered nor mounted are ignored.
    pub fn set_item_value(&self, id: NodeId, value: impl Into<String>, keywords: Vec<String>) {
        let value = value.into();
        let _turn = self.begin_turn();
        {
            let registry = self.inner.registry.borrow();
            let known = registry.contains_item(id)
                || registry.contains_group(id)
                || self.inner.view.borrow().item(id).is_some();
            if !known || registry.value(id).is_some_and(|e| e.value == value) {
                return;
            }
        }
        let score = self.score(&value, &keywords);
        self.inner
            .registry
            .borrow_mut()
            .ids
            .insert(id, ValueEntry { value, keywords });
        self.inner.state.borrow_mut().filtered.items.insert(id, score);
        self.schedule(Slot::ValueChanged, |store| {
            store.sort();
            store.emit();
        });
    }

    /// Whether the root filters and sorts automatically.
    #[must_use]
    pub fn should_filter(&self) -> bool {
        self.inner.config.borrow().should_filter
    }

    /// Borrow the registry.
    #[must_use]
    pub fn registry(&self) -> std::cell::Ref<'_, Registry> {
        self.inner.registry.borrow()
    }
}

/// Keeps an item registered; unregisters on drop.
#[must_use = "the item unregisters when this guard drops"]
pub struct ItemRegistration {
    store: WeakStore,
    id: NodeId,
    active: bool,
}

impl ItemRegistration {
    fn inert(store: &Store, id: NodeId) -> Self {
        Self {
            store: store.downgrade(),
            id,
            active: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether dropping this guard unregisters anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Unregister now.
    pub fn unregister(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !std::mem::replace(&mut self.active, false) {
            return;
        }
        if let Some(store) = self.store.upgrade() {
            store.unregister_item(self.id);
        }
    }
}

impl Drop for ItemRegistration {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ItemRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRegistration")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

/// Keeps a group registered; unregisters it and its members on drop.
#[must_use = "the group unregisters when this guard drops"]
pub struct GroupRegistration {
    store: WeakStore,
    id: NodeId,
    active: bool,
}

impl GroupRegistration {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn unregister(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !std::mem::replace(&mut self.active, false) {
            return;
        }
        if let Some(store) = self.store.upgrade() {
            store.unregister_group(self.id);
        }
    }
}

impl Drop for GroupRegistration {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for GroupRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRegistration")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandConfig;

    #[test]
    fn register_unregister_round_trip() {
        let store = Store::new(CommandConfig::new());
        let id = store.allocate_id();
        let reg = store.register_item(id, None);
        store.set_item_value(id, "apple", Vec::new());
        assert!(store.registry().contains_item(id));
        assert_eq!(store.snapshot().filtered.count, 1);
        reg.unregister();
        assert!(!store.registry().contains_item(id));
        assert!(store.registry().value(id).is_none());
        assert!(!store.snapshot().filtered.items.contains_key(&id));
        assert_eq!(store.snapshot().filtered.count, 0);
    }

    #[test]
    fn duplicate_registration_is_inert() {
        let store = Store::new(CommandConfig::new());
        let id = store.allocate_id();
        let first = store.register_item(id, None);
        let second = store.register_item(id, None);
        assert!(first.is_active());
        assert!(!second.is_active());
        drop(second);
        assert!(store.registry().contains_item(id));
        drop(first);
        assert!(!store.registry().contains_item(id));
    }

    #[test]
    fn item_joins_group_set() {
        let store = Store::new(CommandConfig::new());
        let group = store.allocate_id();
        let item = store.allocate_id();
        let _g = store.register_group(group);
        let reg = store.register_item(item, Some(group));
        assert!(store.registry().members(group).is_some_and(|m| m.contains(&item)));
        drop(reg);
        assert!(store.registry().members(group).is_some_and(|m| m.is_empty()));
    }

    #[test]
    fn group_drop_cascades_to_members() {
        let store = Store::new(CommandConfig::new());
        let group = store.allocate_id();
        let item = store.allocate_id();
        let g = store.register_group(group);
        let reg = store.register_item(item, Some(group));
        drop(g);
        assert!(!store.registry().contains_group(group));
        assert!(!store.registry().contains_item(item));
        // The member's own guard is now a no-op.
        drop(reg);
        assert_eq!(store.registry().item_count(), 0);
    }

    #[test]
    fn unchanged_value_schedules_nothing() {
        let store = Store::new(CommandConfig::new());
        let id = store.allocate_id();
        let _reg = store.register_item(id, None);
        store.set_item_value(id, "apple", Vec::new());
        let _turn = store.begin_turn();
        store.set_item_value(id, "apple", vec!["fruit".into()]);
        assert!(!store.scheduler().is_pending(Slot::ValueChanged));
        store.set_item_value(id, "pear", Vec::new());
        assert!(store.scheduler().is_pending(Slot::ValueChanged));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let store = Store::new(CommandConfig::new());
        let id = store.allocate_id();
        store.set_item_value(id, "ghost", Vec::new());
        assert!(store.registry().value(id).is_none());
        store.unregister_item(id);
        store.unregister_group(id);
        assert_eq!(store.registry().item_count(), 0);
    }

    #[test]
    fn registration_outliving_root_is_harmless() {
        let store = Store::new(CommandConfig::new());
        let id = store.allocate_id();
        let reg = store.register_item(id, None);
        drop(store);
        drop(reg);
    }
}
