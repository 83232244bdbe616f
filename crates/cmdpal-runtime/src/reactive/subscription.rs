#![forbid(unsafe_code)]

//! Listener lists and subscription guards.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct ListenerList {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Subscribers to a piece of shared state.
///
/// Cloning shares the underlying list.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Rc<RefCell<ListenerList>>,
}

impl ListenerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it runs on every [`notify`](Self::notify) until
    /// the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let mut list = self.inner.borrow_mut();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Rc::new(callback)));
        Subscription {
            list: Rc::downgrade(&self.inner),
            id,
            active: true,
        }
    }

    /// Invoke every listener registered at the start of the call.
    pub fn notify(&self) {
        let snapshot: Vec<(u64, Listener)> = self.inner.borrow().entries.clone();
        for (id, listener) in snapshot {
            // Skip listeners unsubscribed by an earlier listener in this pass.
            let live = self.inner.borrow().entries.iter().any(|(e, _)| *e == id);
            if live {
                listener();
            }
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}

/// RAII guard for a registered listener.
///
/// Dropping the guard (or calling [`unsubscribe`](Self::unsubscribe))
/// removes the listener. Unsubscribing twice, or after the source is gone,
/// is a silent no-op.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    list: Weak<RefCell<ListenerList>>,
    id: u64,
    active: bool,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active && self.list.strong_count() > 0
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
