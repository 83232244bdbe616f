#![forbid(unsafe_code)]

//! Palette root.
//!
//! [`Command`] owns a [`Store`] and mounts the parts of a palette against
//! it. Parts hold their own handles, so they may be dropped in any order;
//! dropping the root while parts live only makes pending flushes inert.

use std::fmt;

use cmdpal_a11y::{Attributes, Element, SR_ONLY_STYLE, attr, marker};
use cmdpal_core::{KeyEvent, NodeId};
use cmdpal_runtime::TurnGuard;

use super::config::CommandConfig;
use super::empty::Empty;
use super::group::{Group, GroupProps};
use super::input::{Input, InputProps};
use super::item::{Item, ItemProps};
use super::list::{List, ListProps};
use super::loading::{Loading, LoadingProps};
use super::separator::{Separator, SeparatorProps};
use super::state::Slot;
use super::store::Store;
use super::view::PresentationOrder;

/// A palette root.
#[derive(Clone)]
pub struct Command {
    store: Store,
}

impl Command {
    #[must_use]
    pub fn new(config: CommandConfig) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            controlled = config.is_controlled(),
            should_filter = config.should_filter,
            "command root created"
        );
        Self {
            store: Store::new(config),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Feed the controlled selection. `None` releases control and keeps the
    /// current value.
    pub fn set_value(&self, value: Option<String>) {
        self.store.inner.config.borrow_mut().value = value.clone();
        if let Some(value) = value {
            let value = value.trim().to_owned();
            if self.store.snapshot().value != value {
                self.store.replace_value(value);
            }
        }
    }

    /// Change configuration in place. Filtering is rerun so a change to
    /// `should_filter` or `filter` takes effect immediately.
    pub fn configure(&self, f: impl FnOnce(&mut CommandConfig)) {
        let _turn = self.store.begin_turn();
        f(&mut self.store.inner.config.borrow_mut());
        self.store.filter_items();
        self.store.sort();
        self.store.emit();
    }

    pub fn input(&self, props: InputProps) -> Input {
        Input::mount(&self.store, props)
    }

    pub fn list(&self, props: ListProps) -> List {
        List::mount(&self.store, props)
    }

    /// Mount a top-level item.
    pub fn item(&self, props: ItemProps) -> Item {
        Item::mount(&self.store, None, props)
    }

    pub fn group(&self, props: GroupProps) -> Group {
        Group::mount(&self.store, props)
    }

    pub fn separator(&self, props: SeparatorProps) -> Separator {
        Separator::mount(&self.store, props)
    }

    pub fn empty(&self, text: Option<&str>) -> Empty {
        Empty::mount(&self.store, text.map(str::to_owned))
    }

    pub fn loading(&self, props: LoadingProps) -> Loading {
        Loading::mount(props)
    }

    /// See [`Store::handle_key`].
    pub fn handle_key(&self, event: &mut KeyEvent) -> bool {
        self.store.handle_key(event)
    }

    /// Batch several mutations into one flush.
    pub fn begin_turn(&self) -> TurnGuard<Slot> {
        self.store.begin_turn()
    }

    pub fn flush(&self) {
        self.store.flush();
    }

    pub fn set_presentation_host(&self, host: impl PresentationOrder + 'static) {
        self.store.set_presentation_host(host);
    }

    #[must_use]
    pub fn label_id(&self) -> NodeId {
        self.store.label_id()
    }

    #[must_use]
    pub fn input_id(&self) -> NodeId {
        self.store.input_id()
    }

    #[must_use]
    pub fn list_id(&self) -> NodeId {
        self.store.list_id()
    }

    /// Render the root with its screen-reader label, followed by `children`
    /// (typically the input and list renders).
    #[must_use]
    pub fn render(&self, children: impl IntoIterator<Item = Element>) -> Element {
        let label = self.store.inner.config.borrow().label.clone().unwrap_or_default();
        let label = Element::new(
            "label",
            Attributes::new()
                .marker(marker::LABEL)
                .node(attr::FOR, self.store.input_id())
                .node(attr::ID, self.store.label_id())
                .with(attr::STYLE, SR_ONLY_STYLE),
        )
        .with_text(label);
        Element::div(Attributes::new().marker(marker::ROOT).with(attr::TAB_INDEX, "-1"))
            .with_child(label)
            .with_children(children)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("store", &self.store).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn render_labels_the_input() {
        let cmd = Command::new(CommandConfig::new().label("Global command menu"));
        let input = cmd.input(InputProps::new());
        let root = cmd.render([input.render()]);
        assert_eq!(root.attr(attr::TAB_INDEX), Some("-1"));
        let label = root.find(marker::LABEL).expect("label");
        assert_eq!(label.tag, "label");
        assert_eq!(label.text_content(), "Global command menu");
        assert_eq!(label.attr(attr::STYLE), Some(SR_ONLY_STYLE));
        let input_id = cmd.input_id().to_string();
        assert_eq!(label.attr(attr::FOR), Some(input_id.as_str()));
        let input = root.find(marker::INPUT).expect("input");
        assert_eq!(input.attr(attr::ARIA_LABELLEDBY), label.attr(attr::ID));
    }

    #[test]
    fn set_value_feeds_controlled_selection() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&reported);
        let cmd = Command::new(
            CommandConfig::new()
                .value("a")
                .on_value_change(move |v| r.borrow_mut().push(v.to_owned())),
        );
        let _a = cmd.item(ItemProps::new().value("a"));
        let b = cmd.item(ItemProps::new().value("b"));
        cmd.store().move_by_item(super::super::navigation::Direction::Next);
        assert_eq!(*reported.borrow(), vec!["b".to_owned()]);
        assert_eq!(cmd.store().snapshot().value, "a");
        cmd.set_value(Some(" b ".into()));
        assert!(b.is_selected());
    }

    #[test]
    fn configure_reruns_filtering() {
        let cmd = Command::new(CommandConfig::new());
        let a = cmd.item(ItemProps::new().value("apple"));
        cmd.store().set_search("zzz");
        assert!(!a.is_rendered());
        cmd.configure(|c| c.should_filter = false);
        assert!(a.is_rendered());
        assert_eq!(cmd.store().snapshot().filtered.count, 1);
    }
}
