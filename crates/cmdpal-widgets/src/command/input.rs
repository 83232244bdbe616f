#![forbid(unsafe_code)]

//! Search input.
//!
//! Uncontrolled inputs write every change straight into the root's search.
//! Controlled inputs only report changes through `on_value_change`; the
//! host feeds the accepted text back with [`Input::set_value`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use cmdpal_a11y::{Attributes, Element, Role, attr, marker};

use super::config::ValueCallback;
use super::store::Store;

/// Input properties.
#[derive(Clone, Default)]
pub struct InputProps {
    /// Controlled search text.
    pub value: Option<String>,
    pub on_value_change: Option<ValueCallback>,
}

impl InputProps {
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
    pub fn on_value_change(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_value_change = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for InputProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputProps")
            .field("value", &self.value)
            .field("on_value_change", &self.on_value_change.is_some())
            .finish()
    }
}

/// The search input of a root.
pub struct Input {
    store: Store,
    props: RefCell<InputProps>,
}

impl Input {
    pub(crate) fn mount(store: &Store, props: InputProps) -> Self {
        let controlled = props.value.clone();
        let input = Self {
            store: store.clone(),
            props: RefCell::new(props),
        };
        if let Some(value) = controlled {
            input.store.set_search(value);
        }
        input
    }

    /// Whether the host controls the text.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.props.borrow().value.is_some()
    }

    /// The user edited the text.
    pub fn change(&self, text: &str) {
        let _turn = self.store.begin_turn();
        let (controlled, on_change) = {
            let props = self.props.borrow();
            (props.value.is_some(), props.on_value_change.clone())
        };
        if !controlled {
            self.store.set_search(text);
        }
        if let Some(on_change) = on_change {
            on_change(text);
        }
    }

    /// Feed a controlled value (or release control with `None`).
    pub fn set_value(&self, value: Option<String>) {
        self.props.borrow_mut().value = value.clone();
        if let Some(value) = value {
            self.store.set_search(value);
        }
    }

    /// Text currently shown in the input.
    #[must_use]
    pub fn value(&self) -> String {
        match &self.props.borrow().value {
            Some(value) => value.clone(),
            None => self.store.snapshot().search.clone(),
        }
    }

    #[must_use]
    pub fn render(&self) -> Element {
        let active = self.store.selected_item();
        let attrs = Attributes::new()
            .marker(marker::INPUT)
            .with(attr::AUTOCOMPLETE, "off")
            .with(attr::AUTOCORRECT, "off")
            .flag(attr::SPELLCHECK, false)
            .with(attr::ARIA_AUTOCOMPLETE, "list")
            .role(Role::Combobox)
            .flag(attr::ARIA_EXPANDED, true)
            .node(attr::ARIA_CONTROLS, self.store.list_id())
            .node(attr::ARIA_LABELLEDBY, self.store.label_id())
            .with_opt(attr::ARIA_ACTIVEDESCENDANT, active.map(|id| id.to_string()))
            .node(attr::ID, self.store.input_id())
            .with(attr::TYPE, "text")
            .with(attr::VALUE, self.value());
        Element::new("input", attrs)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("props", &*self.props.borrow())
            .finish()
    }
}
