#![forbid(unsafe_code)]

//! Keyboard map.
//!
//! | Key | Action |
//! |-----|--------|
//! | Down, Ctrl+N, Ctrl+J | next item (Super: last, Alt: next group) |
//! | Up, Ctrl+P, Ctrl+K | previous item (Super: first, Alt: previous group) |
//! | Home / End | first / last item |
//! | Enter | confirm the selected item |
//!
//! The Ctrl bindings only apply with vim bindings on. Enter is ignored
//! while an IME composition is in progress.

use cmdpal_core::{KeyCode, KeyEvent};

use super::navigation::Direction;
use super::state::SetOptions;
use super::state::StateUpdate;
use super::store::Store;

/// What a key does to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Prev,
    NextGroup,
    PrevGroup,
    First,
    Last,
    Confirm,
}

/// Map `event` to an action. Release events and events someone already
/// handled map to nothing.
#[must_use]
pub fn map_key(event: &KeyEvent, vim_bindings: bool) -> Option<KeyAction> {
    if event.default_prevented || !event.is_actionable() {
        return None;
    }
    let vim = vim_bindings && event.ctrl();
    match event.code {
        KeyCode::Down => Some(next(event)),
        KeyCode::Char('n' | 'j') if vim => Some(next(event)),
        KeyCode::Up => Some(prev(event)),
        KeyCode::Char('p' | 'k') if vim => Some(prev(event)),
        KeyCode::Home => Some(KeyAction::First),
        KeyCode::End => Some(KeyAction::Last),
        KeyCode::Enter if !event.composing => Some(KeyAction::Confirm),
        _ => None,
    }
}

fn next(event: &KeyEvent) -> KeyAction {
    if event.super_key() {
        KeyAction::Last
    } else if event.alt() {
        KeyAction::NextGroup
    } else {
        KeyAction::Next
    }
}

fn prev(event: &KeyEvent) -> KeyAction {
    if event.super_key() {
        KeyAction::First
    } else if event.alt() {
        KeyAction::PrevGroup
    } else {
        KeyAction::Prev
    }
}

impl Store {
    /// Handle a key event for this root. Returns whether it was consumed;
    /// consumed events are marked `default_prevented`.
    pub fn handle_key(&self, event: &mut KeyEvent) -> bool {
        let vim = self.inner.config.borrow().vim_bindings;
        let Some(action) = map_key(event, vim) else {
            return false;
        };
        event.prevent_default();
        self.apply_key_action(action);
        true
    }

    /// Run `action` against the selection.
    pub fn apply_key_action(&self, action: KeyAction) {
        let _turn = self.begin_turn();
        match action {
            KeyAction::Next => self.move_by_item(Direction::Next),
            KeyAction::Prev => self.move_by_item(Direction::Prev),
            KeyAction::NextGroup => self.move_by_group(Direction::Next),
            KeyAction::PrevGroup => self.move_by_group(Direction::Prev),
            KeyAction::First => self.move_to_index(0),
            KeyAction::Last => self.select_last(),
            KeyAction::Confirm => {
                if let Some(id) = self.selected_item() {
                    self.confirm_item(id);
                }
            }
        }
    }

    /// Select `item` without scrolling and fire its `on_select`. Disabled
    /// and unmounted items are ignored.
    pub(crate) fn confirm_item(&self, item: cmdpal_core::NodeId) {
        let (value, on_select) = {
            let view = self.inner.view.borrow();
            match view.item(item) {
                Some(node) if !node.disabled => (node.value.clone(), node.on_select.clone()),
                _ => return,
            }
        };
        let _turn = self.begin_turn();
        self.set_state(StateUpdate::Value(value.clone()), SetOptions::SILENT);
        #[cfg(feature = "tracing")]
        tracing::debug!(item = %item, value = %value, "item confirmed");
        if let Some(on_select) = on_select {
            on_select(&value);
        }
    }
}
