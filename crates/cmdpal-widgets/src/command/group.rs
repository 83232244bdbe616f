#![forbid(unsafe_code)]

//! Item group with an optional heading.
//!
//! A group stays mounted while filtered out; it renders with `hidden` until
//! one of its members scores above zero again. Dropping a group unmounts
//! its members with it.

use std::cell::RefCell;
use std::fmt;

use cmdpal_a11y::{Attributes, Element, Role, attr, marker};
use cmdpal_core::NodeId;

use super::context::GroupRegistration;
use super::item::{Item, ItemProps, render_item};
use super::store::Store;
use super::view::GroupNode;

/// Group properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupProps {
    /// Explicit value; defaults to the heading.
    pub value: Option<String>,
    pub heading: Option<String>,
    /// Always render the group, and by default its items.
    pub force_mount: bool,
}

impl GroupProps {
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
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    #[must_use]
    pub fn force_mount(mut self, force_mount: bool) -> Self {
        self.force_mount = force_mount;
        self
    }

    fn derived_value(&self) -> String {
        self.value
            .as_deref()
            .or(self.heading.as_deref())
            .unwrap_or_default()
            .trim()
            .to_owned()
    }
}

/// A mounted group.
pub struct Group {
    store: Store,
    id: NodeId,
    heading_id: NodeId,
    force_mount: bool,
    registration: RefCell<Option<GroupRegistration>>,
}

impl Group {
    pub(crate) fn mount(store: &Store, props: GroupProps) -> Self {
        let _turn = store.begin_turn();
        let id = store.allocate_id();
        let heading_id = store.allocate_id();
        let value = props.derived_value();
        store.inner.view.borrow_mut().mount_group(
            id,
            GroupNode {
                value: value.clone(),
                heading: props.heading,
                heading_id,
                force_mount: props.force_mount,
                items: Vec::new(),
            },
        );
        let registration = store.register_group(id);
        store.set_item_value(id, value, Vec::new());
        Self {
            store: store.clone(),
            id,
            heading_id,
            force_mount: props.force_mount,
            registration: RefCell::new(Some(registration)),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Id of the heading node (`aria-labelledby` target).
    #[must_use]
    pub fn heading_id(&self) -> NodeId {
        self.heading_id
    }

    /// Mount an item inside this group.
    pub fn item(&self, props: ItemProps) -> Item {
        Item::mount(&self.store, Some((self.id, self.force_mount)), props)
    }

    /// Change the heading or value. The force-mount flag is fixed at mount.
    pub fn update(&self, props: GroupProps) {
        let _turn = self.store.begin_turn();
        let value = props.derived_value();
        {
            let mut view = self.store.inner.view.borrow_mut();
            let Some(node) = view.group_mut(self.id) else {
                return;
            };
            node.value = value.clone();
            node.heading = props.heading;
        }
        self.store.set_item_value(self.id, value, Vec::new());
        self.store.emit();
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.store
            .view()
            .group(self.id)
            .map(|g| g.value.clone())
            .unwrap_or_default()
    }

    /// Whether the group is visible (rendered without `hidden`).
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.store.is_group_rendered(self.id)
    }

    /// Render with member items in presentation order.
    #[must_use]
    pub fn render(&self) -> Option<Element> {
        render_group(&self.store, self.id)
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        let _turn = self.store.begin_turn();
        drop(self.registration.get_mut().take());
        self.store.inner.view.borrow_mut().unmount_group(self.id);
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("id", &self.id)
            .field("heading_id", &self.heading_id)
            .field("force_mount", &self.force_mount)
            .finish()
    }
}

pub(crate) fn render_group(store: &Store, id: NodeId) -> Option<Element> {
    let rendered = store.is_group_rendered(id);
    let node = store.view().group(id)?.clone();
    let mut attrs = Attributes::new()
        .marker(marker::GROUP)
        .role(Role::Presentation)
        .with(attr::DATA_VALUE, node.value.clone());
    if !rendered {
        attrs.set(attr::HIDDEN, "");
    }
    let mut el = Element::div(attrs);
    if let Some(heading) = &node.heading {
        el = el.with_child(
            Element::div(
                Attributes::new()
                    .marker(marker::GROUP_HEADING)
                    .flag(attr::ARIA_HIDDEN, true)
                    .node(attr::ID, node.heading_id),
            )
            .with_text(heading.clone()),
        );
    }
    let mut items_attrs = Attributes::new().marker(marker::GROUP_ITEMS).role(Role::Group);
    if node.heading.is_some() {
        items_attrs.set(attr::ARIA_LABELLEDBY, node.heading_id.to_string());
    }
    let items = node.items.iter().filter_map(|item| render_item(store, *item));
    Some(el.with_child(Element::div(items_attrs).with_children(items)))
}
