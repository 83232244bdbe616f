#![forbid(unsafe_code)]

//! Result list.
//!
//! Renders the listbox and its sizer, with items, groups, and separators in
//! presentation order. The host reports the sizer's measured height through
//! [`List::observe_height`]; it is exposed as the `--cmdk-list-height`
//! custom property for height transitions.

use std::cell::Cell;
use std::fmt;

use cmdpal_a11y::{Attributes, Element, Role, attr, marker};

use super::group::render_group;
use super::item::render_item;
use super::separator::render_separator;
use super::store::Store;
use super::view::Entry;

/// Accessible label used when none is given.
pub const DEFAULT_LIST_LABEL: &str = "Suggestions";

/// List properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProps {
    pub label: Option<String>,
}

impl ListProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The list of a root.
pub struct List {
    store: Store,
    label: String,
    height: Cell<Option<f64>>,
}

impl List {
    pub(crate) fn mount(store: &Store, props: ListProps) -> Self {
        Self {
            store: store.clone(),
            label: props.label.unwrap_or_else(|| DEFAULT_LIST_LABEL.to_owned()),
            height: Cell::new(None),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Record the measured height of the list content, in pixels.
    pub fn observe_height(&self, px: f64) {
        self.height.set(Some(px));
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.height.get()
    }

    /// Value of the `style` attribute, once a height was observed.
    #[must_use]
    pub fn height_style(&self) -> Option<String> {
        self.height
            .get()
            .map(|h| format!("{}: {h:.1}px", attr::LIST_HEIGHT_VAR))
    }

    #[must_use]
    pub fn render(&self) -> Element {
        let entries: Vec<Entry> = self.store.view().entries().to_vec();
        let children = entries.into_iter().filter_map(|entry| match entry {
            Entry::Item(id) => render_item(&self.store, id),
            Entry::Group(id) => render_group(&self.store, id),
            Entry::Separator(id) => render_separator(&self.store, id),
        });
        let sizer =
            Element::div(Attributes::new().marker(marker::LIST_SIZER)).with_children(children);
        let attrs = Attributes::new()
            .marker(marker::LIST)
            .role(Role::Listbox)
            .with(attr::ARIA_LABEL, self.label.clone())
            .node(attr::ID, self.store.list_id())
            .with_opt(attr::STYLE, self.height_style());
        Element::div(attrs).with_child(sizer)
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("label", &self.label)
            .field("height", &self.height.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandConfig, GroupProps, ItemProps, SeparatorProps};

    #[test]
    fn default_label_and_height_property() {
        let cmd = Command::new(CommandConfig::new());
        let list = cmd.list(ListProps::new());
        assert_eq!(list.label(), "Suggestions");
        assert!(list.render().attr(attr::STYLE).is_none());
        list.observe_height(87.5);
        assert_eq!(list.render().attr(attr::STYLE), Some("--cmdk-list-height: 87.5px"));
    }

    #[test]
    fn renders_entries_in_presentation_order() {
        let cmd = Command::new(
            CommandConfig::new().filter(|v, _, _| if v == "b" { 2.0 } else { 1.0 }),
        );
        let list = cmd.list(ListProps::new().label("Results"));
        let _a = cmd.item(ItemProps::new().value("a"));
        let _sep = cmd.separator(SeparatorProps::new());
        let group = cmd.group(GroupProps::new().heading("G"));
        let _b = group.item(ItemProps::new().value("b"));
        let el = list.render();
        assert_eq!(el.attr(attr::ARIA_LABEL), Some("Results"));
        assert_eq!(el.attr(attr::ROLE), Some("listbox"));
        let sizer = el.find(marker::LIST_SIZER).expect("sizer");
        assert_eq!(sizer.children.len(), 3);
        assert!(sizer.children[1].attrs.has(marker::SEPARATOR));

        cmd.store().set_search("q");
        let el = list.render();
        let sizer = el.find(marker::LIST_SIZER).expect("sizer");
        // Separators hide during search; groups land after loose items.
        assert_eq!(sizer.children.len(), 2);
        assert!(sizer.children[0].attrs.has(marker::ITEM));
        assert!(sizer.children[1].attrs.has(marker::GROUP));
    }
}
