#![forbid(unsafe_code)]

//! Selectable item.
//!
//! An [`Item`] is mounted by [`Command::item`](super::Command::item) or
//! [`Group::item`](super::Group::item) and unmounted when dropped. Its
//! display value is the explicit `value`, else its text, else the value
//! it had before, always trimmed.
//!
//! # Invariants
//!
//! 1. Force-mounted items are never registered for filtering; they are
//!    always rendered.
//! 2. Dropping an item unregisters it before removing it from the view, so
//!    reselection sees the view without it.
//! 3. Pointer selection never scrolls; click and Enter confirm without
//!    scrolling.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use cmdpal_a11y::{Attributes, Element, Role, attr, marker};
use cmdpal_core::NodeId;

use super::config::ValueCallback;
use super::context::ItemRegistration;
use super::state::{SetOptions, StateUpdate};
use super::store::Store;
use super::view::ItemNode;

/// Item properties.
#[derive(Clone, Default)]
pub struct ItemProps {
    /// Explicit display value; takes precedence over `text`.
    pub value: Option<String>,
    /// Rendered text content.
    pub text: Option<String>,
    /// Extra terms the scorer matches against.
    pub keywords: Vec<String>,
    pub disabled: bool,
    /// Always render. `None` inherits the enclosing group's setting.
    pub force_mount: Option<bool>,
    pub on_select: Option<ValueCallback>,
}

impl ItemProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn force_mount(mut self, force_mount: bool) -> Self {
        self.force_mount = Some(force_mount);
        self
    }

    #[must_use]
    pub fn on_select(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for ItemProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemProps")
            .field("value", &self.value)
            .field("text", &self.text)
            .field("keywords", &self.keywords)
            .field("disabled", &self.disabled)
            .field("force_mount", &self.force_mount)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

/// A mounted item.
pub struct Item {
    store: Store,
    id: NodeId,
    group: Option<NodeId>,
    group_force_mount: bool,
    registration: RefCell<Option<ItemRegistration>>,
}

fn derive_value(props: &ItemProps, previous: &str) -> String {
    props
        .value
        .as_deref()
        .or(props.text.as_deref())
        .unwrap_or(previous)
        .trim()
        .to_owned()
}

fn trimmed(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.trim().to_owned()).collect()
}

impl Item {
    pub(crate) fn mount(store: &Store, group: Option<(NodeId, bool)>, props: ItemProps) -> Self {
        let _turn = store.begin_turn();
        let id = store.allocate_id();
        let group_force_mount = group.is_some_and(|(_, forced)| forced);
        let group = group.map(|(g, _)| g);
        let force_mount = props.force_mount.unwrap_or(group_force_mount);
        let value = derive_value(&props, "");
        store.inner.view.borrow_mut().mount_item(
            id,
            ItemNode {
                group,
                value: value.clone(),
                text: props.text.clone(),
                disabled: props.disabled,
                force_mount,
                on_select: props.on_select.clone(),
            },
        );
        let registration = (!force_mount).then(|| store.register_item(id, group));
        store.set_item_value(id, value, trimmed(&props.keywords));
        Self {
            store: store.clone(),
            id,
            group,
            group_force_mount,
            registration: RefCell::new(registration),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Enclosing group, if any.
    #[must_use]
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    /// Apply new properties.
    pub fn update(&self, props: ItemProps) {
        let _turn = self.store.begin_turn();
        let force_mount = props.force_mount.unwrap_or(self.group_force_mount);
        let value = {
            let mut view = self.store.inner.view.borrow_mut();
            let Some(node) = view.item_mut(self.id) else {
                return;
            };
            node.value = derive_value(&props, &node.value);
            node.text = props.text.clone();
            node.disabled = props.disabled;
            node.force_mount = force_mount;
            node.on_select = props.on_select.clone();
            node.value.clone()
        };
        let registered = self.registration.borrow().is_some();
        if force_mount && registered {
            let old = self.registration.borrow_mut().take();
            drop(old);
        } else if !force_mount && !registered {
            let reg = self.store.register_item(self.id, self.group);
            *self.registration.borrow_mut() = Some(reg);
        }
        self.store.set_item_value(self.id, value, trimmed(&props.keywords));
        self.store.emit();
    }

    /// Current display value.
    #[must_use]
    pub fn value(&self) -> String {
        self.store
            .view()
            .item(self.id)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.store.view().item(self.id).is_some_and(|n| n.disabled)
    }

    /// Whether this item's value is the selected value.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        let value = self.value();
        let state = self.store.snapshot();
        !state.value.is_empty() && state.value == value
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.store.is_item_rendered(self.id)
    }

    /// Pointer click: select and fire `on_select`.
    pub fn click(&self) {
        if self.is_rendered() {
            self.store.confirm_item(self.id);
        }
    }

    /// Pointer movement over the item: select without scrolling.
    pub fn pointer_move(&self) {
        if self.store.inner.config.borrow().disable_pointer_selection
            || self.is_disabled()
            || !self.is_rendered()
        {
            return;
        }
        let value = self.value();
        self.store.set_state(StateUpdate::Value(value), SetOptions::SILENT);
    }

    /// Render, or `None` when filtered out or unmounted.
    #[must_use]
    pub fn render(&self) -> Option<Element> {
        render_item(&self.store, self.id)
    }
}

impl Drop for Item {
    fn drop(&mut self) {
        let _turn = self.store.begin_turn();
        match self.registration.get_mut().take() {
            Some(registration) => drop(registration),
            None => self.store.release_unregistered_item(self.id),
        }
        self.store.inner.view.borrow_mut().unmount_item(self.id);
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("registered", &self.registration.borrow().is_some())
            .finish()
    }
}

pub(crate) fn render_item(store: &Store, id: NodeId) -> Option<Element> {
    if !store.is_item_rendered(id) {
        return None;
    }
    let view = store.view();
    let node = view.item(id)?;
    let selected = {
        let state = store.snapshot();
        !state.value.is_empty() && state.value == node.value
    };
    let attrs = Attributes::new()
        .node(attr::ID, id)
        .marker(marker::ITEM)
        .role(Role::Option)
        .flag(attr::ARIA_DISABLED, node.disabled)
        .flag(attr::ARIA_SELECTED, selected)
        .flag(attr::DATA_DISABLED, node.disabled)
        .flag(attr::DATA_SELECTED, selected)
        .with(attr::DATA_VALUE, node.value.clone());
    let el = Element::div(attrs);
    Some(match &node.text {
        Some(text) => el.with_text(text.clone()),
        None => el,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::command::{Command, CommandConfig};

    #[test]
    fn value_falls_back_to_text_then_previous() {
        let cmd = Command::new(CommandConfig::new());
        let item = cmd.item(ItemProps::new().text("  Open file "));
        assert_eq!(item.value(), "Open file");
        item.update(ItemProps::new().value(" open "));
        assert_eq!(item.value(), "open");
        item.update(ItemProps::new());
        assert_eq!(item.value(), "open");
        assert_eq!(
            cmd.store().registry().value(item.id()).map(|e| e.value.clone()),
            Some("open".to_owned())
        );
    }

    #[test]
    fn keywords_are_trimmed() {
        let cmd = Command::new(CommandConfig::new());
        let item = cmd.item(ItemProps::new().value("a").keywords([" alpha "]));
        let keywords = cmd
            .store()
            .registry()
            .value(item.id())
            .map(|e| e.keywords.clone());
        assert_eq!(keywords, Some(vec!["alpha".to_owned()]));
    }

    #[test]
    fn force_mounted_item_is_not_registered() {
        let cmd = Command::new(CommandConfig::new());
        let item = cmd.item(ItemProps::new().value("always").force_mount(true));
        assert!(!cmd.store().registry().contains_item(item.id()));
        cmd.store().set_search("zzz");
        assert!(item.is_rendered());
        item.update(ItemProps::new().value("always"));
        assert!(cmd.store().registry().contains_item(item.id()));
        assert!(!item.is_rendered());
    }

    #[test]
    fn dropping_selected_force_mounted_item_reselects() {
        let cmd = Command::new(CommandConfig::new());
        let pinned = cmd.item(ItemProps::new().value("a").force_mount(true));
        let _b = cmd.item(ItemProps::new().value("b"));
        assert!(pinned.is_selected());
        let id = pinned.id();
        drop(pinned);
        assert_eq!(cmd.store().snapshot().value, "b");
        assert!(cmd.store().registry().value(id).is_none());
        assert!(!cmd.store().snapshot().filtered.items.contains_key(&id));
    }

    #[test]
    fn click_confirms_and_fires_on_select() {
        let cmd = Command::new(CommandConfig::new());
        let fired = Rc::new(RefCell::new(String::new()));
        let f = Rc::clone(&fired);
        let _a = cmd.item(ItemProps::new().value("a"));
        let b = cmd.item(
            ItemProps::new()
                .value("b")
                .on_select(move |v| *f.borrow_mut() = v.to_owned()),
        );
        cmd.store().take_scroll_log();
        b.click();
        assert!(b.is_selected());
        assert_eq!(*fired.borrow(), "b");
        assert!(cmd.store().take_scroll_log().is_empty());
    }

    #[test]
    fn disabled_item_ignores_pointer() {
        let cmd = Command::new(CommandConfig::new());
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _a = cmd.item(ItemProps::new().value("a"));
        let b = cmd.item(
            ItemProps::new()
                .value("b")
                .disabled(true)
                .on_select(move |_| h.set(h.get() + 1)),
        );
        b.click();
        b.pointer_move();
        assert_eq!(hits.get(), 0);
        assert!(!b.is_selected());
    }

    #[test]
    fn pointer_selection_can_be_disabled() {
        let cmd = Command::new(CommandConfig::new().disable_pointer_selection(true));
        let _a = cmd.item(ItemProps::new().value("a"));
        let b = cmd.item(ItemProps::new().value("b"));
        b.pointer_move();
        assert!(!b.is_selected());

        let cmd = Command::new(CommandConfig::new());
        let _a = cmd.item(ItemProps::new().value("a"));
        let b = cmd.item(ItemProps::new().value("b"));
        b.pointer_move();
        assert!(b.is_selected());
    }

    #[test]
    fn render_carries_state_attributes() {
        let cmd = Command::new(CommandConfig::new());
        let item = cmd.item(ItemProps::new().value("apple").text("Apple"));
        let el = item.render().expect("rendered");
        assert_eq!(el.attr(marker::ITEM), Some(""));
        assert_eq!(el.attr(attr::ROLE), Some("option"));
        assert_eq!(el.attr(attr::ARIA_SELECTED), Some("true"));
        assert_eq!(el.attr(attr::DATA_SELECTED), Some("true"));
        assert_eq!(el.attr(attr::ARIA_DISABLED), Some("false"));
        assert_eq!(el.attr(attr::DATA_VALUE), Some("apple"));
        assert_eq!(el.attr(attr::ID), Some(item.id().to_string().as_str()));
        assert_eq!(el.text_content(), "Apple");
        cmd.store().set_search("zzz");
        assert!(item.render().is_none());
    }
}
