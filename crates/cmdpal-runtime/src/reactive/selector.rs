#![forbid(unsafe_code)]

//! Reading shared state from components.
//!
//! A [`Source`] is anything that owns state and a listener list; palette
//! stores implement it. Components read through a [`Selector<T>`], which
//! caches its projection, re-selects on every emit, and bumps a version
//! (and optionally calls back) only when the projected value actually
//! changed. A host renderer uses the version to decide whether a
//! component needs to re-render.
//!
//! # Usage
//!
//! ```ignore
//! let is_empty = Selector::new(&store, |state| state.filtered.count == 0);
//! store.set_search("zzz");
//! if is_empty.get() {
//!     // render the empty state
//! }
//! ```
//!
//! # Invariants
//!
//! 1. A `Selector` re-selects exactly once per emit.
//! 2. `Selector::version()` increments only when the selected value changes.
//! 3. Dropping a `Selector` unsubscribes it.
//!
//! # Failure Modes
//!
//! - Projection panic: propagates to whoever triggered the emit.
//! - Source dropped while a selector is alive: the selector keeps the
//!   source alive (it holds a clone).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::subscription::Subscription;

/// Shared state that notifies subscribers when it changes.
pub trait Source {
    type State;

    /// Run `f` against the current state.
    fn with_state<R>(&self, f: impl FnOnce(&Self::State) -> R) -> R;

    /// Register a change listener.
    fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription;
}

// ---------------------------------------------------------------------------
// Selector<T>: cached, change-detecting read
// ---------------------------------------------------------------------------

type ChangeHook<T> = Rc<dyn Fn(&T)>;

struct SelectorCell<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    eval: Box<dyn Fn() -> T>,
    on_change: RefCell<Option<ChangeHook<T>>>,
}

impl<T: Clone + PartialEq> SelectorCell<T> {
    fn refresh(&self) {
        let next = (self.eval)();
        if *self.value.borrow() == next {
            return;
        }
        *self.value.borrow_mut() = next.clone();
        self.version.set(self.version.get() + 1);
        let hook = self.on_change.borrow().clone();
        if let Some(hook) = hook {
            hook(&next);
        }
    }
}

/// A cached projection of a [`Source`] that tracks changes.
pub struct Selector<T> {
    cell: Rc<SelectorCell<T>>,
    _subscription: Subscription,
}

impl<T: Clone + PartialEq + 'static> Selector<T> {
    /// Select from `source` now and after every emit.
    pub fn new<S>(source: &S, select: impl Fn(&S::State) -> T + 'static) -> Self
    where
        S: Source + Clone + 'static,
    {
        let src = source.clone();
        let eval = move || src.with_state(|state| select(state));
        let initial = eval();
        let cell = Rc::new(SelectorCell {
            value: RefCell::new(initial),
            version: Cell::new(0),
            eval: Box::new(eval),
            on_change: RefCell::new(None),
        });
        let weak: Weak<SelectorCell<T>> = Rc::downgrade(&cell);
        let subscription = source.subscribe(move || {
            if let Some(cell) = weak.upgrade() {
                cell.refresh();
            }
        });
        Self {
            cell,
            _subscription: subscription,
        }
    }

    /// Call `hook` with the new value whenever the selection changes.
    #[must_use]
    pub fn on_change(self, hook: impl Fn(&T) + 'static) -> Self {
        *self.cell.on_change.borrow_mut() = Some(Rc::new(hook));
        self
    }

    /// The value selected at the last emit (or at construction).
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    /// Number of observed changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version.get()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("value", &*self.cell.value.borrow())
            .field("version", &self.cell.version.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
