#![forbid(unsafe_code)]

//! Empty state: rendered only while no item passes the filter.

use std::fmt;

use cmdpal_a11y::{Attributes, Element, Role, marker};
use cmdpal_runtime::Selector;

use super::store::Store;

pub struct Empty {
    text: Option<String>,
    visible: Selector<bool>,
}

impl Empty {
    pub(crate) fn mount(store: &Store, text: Option<String>) -> Self {
        Self {
            text,
            visible: store.select(|state| state.filtered.count == 0),
        }
    }

    /// Whether the empty state shows.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    #[must_use]
    pub fn render(&self) -> Option<Element> {
        if !self.visible.get() {
            return None;
        }
        let el = Element::div(Attributes::new().marker(marker::EMPTY).role(Role::Presentation));
        Some(match &self.text {
            Some(text) => el.with_text(text.clone()),
            None => el,
        })
    }
}

impl fmt::Debug for Empty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Empty")
            .field("text", &self.text)
            .field("visible", &self.visible.get())
            .finish()
    }
}
