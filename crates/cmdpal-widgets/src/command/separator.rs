#![forbid(unsafe_code)]

//! Visual separator between items or groups. Hidden while searching unless
//! `always_render` is set.

use cmdpal_a11y::{Attributes, Element, Role, marker};
use cmdpal_core::NodeId;

use super::store::Store;
use super::view::SeparatorNode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeparatorProps {
    pub always_render: bool,
}

impl SeparatorProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn always_render(mut self, on: bool) -> Self {
        self.always_render = on;
        self
    }
}

#[derive(Debug)]
pub struct Separator {
    store: Store,
    id: NodeId,
}

impl Separator {
    pub(crate) fn mount(store: &Store, props: SeparatorProps) -> Self {
        let id = store.allocate_id();
        store.inner.view.borrow_mut().mount_separator(
            id,
            SeparatorNode {
                always_render: props.always_render,
            },
        );
        Self {
            store: store.clone(),
            id,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        separator_rendered(&self.store, self.id)
    }

    #[must_use]
    pub fn render(&self) -> Option<Element> {
        render_separator(&self.store, self.id)
    }
}

impl Drop for Separator {
    fn drop(&mut self) {
        self.store.inner.view.borrow_mut().unmount_separator(self.id);
    }
}

fn separator_rendered(store: &Store, id: NodeId) -> bool {
    let always = store.view().separator(id).map(|s| s.always_render);
    match always {
        Some(always) => always || store.snapshot().search.is_empty(),
        None => false,
    }
}

pub(crate) fn render_separator(store: &Store, id: NodeId) -> Option<Element> {
    separator_rendered(store, id)
        .then(|| Element::div(Attributes::new().marker(marker::SEPARATOR).role(Role::Separator)))
}
