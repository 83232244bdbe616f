#![forbid(unsafe_code)]

//! Keyboard events delivered by the host.
//!
//! The host translates its native key events into [`KeyEvent`] before
//! handing them to a palette root. The event doubles as the handled-flag
//! carrier: the root skips events whose `default_prevented` flag is already
//! set and sets it on events it consumes.

use bitflags::bitflags;

/// A key, independent of any modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE = 0;
        const SHIFT = 0b0001;
        const ALT = 0b0010;
        const CTRL = 0b0100;
        /// Command on macOS, the Windows key elsewhere.
        const SUPER = 0b1000;
    }
}

/// Press, repeat, or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A key event as seen by the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
    /// An IME composition is in progress; confirmation keys must be ignored.
    pub composing: bool,
    /// Someone upstream already handled this event.
    pub default_prevented: bool,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
            composing: false,
            default_prevented: false,
        }
    }

    /// Set modifiers (builder).
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind (builder).
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the event as part of an IME composition (builder).
    #[must_use]
    pub const fn composing(mut self) -> Self {
        self.composing = true;
        self
    }

    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }

    /// Flag the event as handled so later handlers skip it.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Release events never drive navigation.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_modifiers() {
        let ev = KeyEvent::new(KeyCode::Char('j')).with_modifiers(Modifiers::CTRL);
        assert!(ev.ctrl());
        assert!(!ev.alt());
        assert!(!ev.super_key());
    }

    #[test]
    fn prevent_default_sticks() {
        let mut ev = KeyEvent::from(KeyCode::Down);
        assert!(!ev.default_prevented);
        ev.prevent_default();
        assert!(ev.default_prevented);
    }

    #[test]
    fn release_is_not_actionable() {
        let ev = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Release);
        assert!(!ev.is_actionable());
        assert!(KeyEvent::new(KeyCode::Down).is_actionable());
    }
}
