#![forbid(unsafe_code)]

//! Modal palette.
//!
//! [`Dialog`] wraps a [`Command`] with open state. Open state is owned by
//! the host: Escape and overlay clicks only request a change through
//! `on_open_change`, and the host answers with [`Dialog::set_open`].
//!
//! # Failure Modes
//!
//! - Without `on_open_change` the dialog cannot be dismissed by the user;
//!   Escape is still consumed so it does not reach the page.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use cmdpal_a11y::{Attributes, Element, attr, marker};
use cmdpal_core::{KeyCode, KeyEvent};

use super::config::CommandConfig;
use super::root::Command;

/// Dialog properties.
#[derive(Clone, Default)]
pub struct DialogProps {
    pub open: bool,
    pub on_open_change: Option<Rc<dyn Fn(bool)>>,
    /// Accessible label of the dialog content.
    pub label: Option<String>,
}

impl DialogProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    #[must_use]
    pub fn on_open_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_open_change = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Debug for DialogProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogProps")
            .field("open", &self.open)
            .field("on_open_change", &self.on_open_change.is_some())
            .field("label", &self.label)
            .finish()
    }
}

/// Rendered dialog: the overlay and the content holding the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogParts {
    pub overlay: Element,
    pub content: Element,
}

pub struct Dialog {
    command: Command,
    open: Cell<bool>,
    on_open_change: Option<Rc<dyn Fn(bool)>>,
    label: Option<String>,
}

impl Dialog {
    #[must_use]
    pub fn new(props: DialogProps, config: CommandConfig) -> Self {
        Self {
            command: Command::new(config),
            open: Cell::new(props.open),
            on_open_change: props.on_open_change,
            label: props.label,
        }
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn set_open(&self, open: bool) {
        self.open.set(open);
    }

    /// Route a key to the palette. Closed dialogs consume nothing.
    pub fn handle_key(&self, event: &mut KeyEvent) -> bool {
        if !self.open.get() || event.default_prevented || !event.is_actionable() {
            return false;
        }
        if event.code == KeyCode::Escape {
            event.prevent_default();
            self.request_open(false);
            return true;
        }
        self.command.handle_key(event)
    }

    /// Pointer down on the overlay.
    pub fn overlay_click(&self) {
        if self.open.get() {
            self.request_open(false);
        }
    }

    fn request_open(&self, open: bool) {
        #[cfg(feature = "tracing")]
        tracing::debug!(open, "dialog open change requested");
        if let Some(f) = &self.on_open_change {
            f(open);
        }
    }

    /// Render overlay and content while open; `children` go inside the root.
    #[must_use]
    pub fn render(&self, children: impl IntoIterator<Item = Element>) -> Option<DialogParts> {
        if !self.open.get() {
            return None;
        }
        let overlay = Element::div(Attributes::new().marker(marker::OVERLAY));
        let content = Element::div(
            Attributes::new()
                .marker(marker::DIALOG)
                .with_opt(attr::ARIA_LABEL, self.label.clone()),
        )
        .with_child(self.command.render(children));
        Some(DialogParts { overlay, content })
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("open", &self.open.get())
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ItemProps;
    use std::cell::RefCell;

    fn make_dialog(open: bool) -> (Dialog, Rc<RefCell<Vec<bool>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&requests);
        let props = DialogProps::new()
            .open(open)
            .label("Command menu")
            .on_open_change(move |open| r.borrow_mut().push(open));
        (Dialog::new(props, CommandConfig::new()), requests)
    }

    #[test]
    fn escape_requests_close() {
        let (dialog, requests) = make_dialog(true);
        let mut esc = KeyEvent::new(KeyCode::Escape);
        assert!(dialog.handle_key(&mut esc));
        assert!(esc.default_prevented);
        assert_eq!(*requests.borrow(), vec![false]);
        assert!(dialog.is_open());
    }

    #[test]
    fn closed_dialog_ignores_keys_and_renders_nothing() {
        let (dialog, requests) = make_dialog(false);
        let mut esc = KeyEvent::new(KeyCode::Escape);
        assert!(!dialog.handle_key(&mut esc));
        dialog.overlay_click();
        assert!(requests.borrow().is_empty());
        assert!(dialog.render(std::iter::empty()).is_none());
    }

    #[test]
    fn keys_reach_the_palette() {
        let (dialog, _) = make_dialog(true);
        let _a = dialog.command().item(ItemProps::new().value("a"));
        let b = dialog.command().item(ItemProps::new().value("b"));
        assert!(dialog.handle_key(&mut KeyEvent::new(KeyCode::Down)));
        assert!(b.is_selected());
    }

    #[test]
    fn render_nests_root_in_content() {
        let (dialog, requests) = make_dialog(true);
        let parts = dialog.render(std::iter::empty()).expect("open");
        assert!(parts.overlay.attrs.has(marker::OVERLAY));
        assert_eq!(parts.content.attr(attr::ARIA_LABEL), Some("Command menu"));
        assert!(parts.content.find(marker::ROOT).is_some());
        dialog.overlay_click();
        assert_eq!(*requests.borrow(), vec![false]);
    }
}
