#![forbid(unsafe_code)]

//! Per-root store.
//!
//! A [`Store`] is a cheap handle onto one palette root: its [`State`], the
//! registry of mounted items and groups, the presentation view model, the
//! configuration, and the coalescing scheduler. Every component of a root
//! holds a clone; roots never share anything.
//!
//! # Invariants
//!
//! 1. `set_state` with an unchanged value is a no-op: no recomputation, no
//!    scheduling, no notification.
//! 2. A search change filters and sorts synchronously, before any listener
//!    runs.
//! 3. In controlled mode a value change is reported through
//!    `on_value_change` and never assigned or emitted; the displayed value
//!    only moves when the host feeds one back.
//! 4. No `RefCell` borrow is held while listeners or `on_value_change` run.
//! 5. Scheduled tasks hold a weak reference; a task whose root is gone
//!    does nothing.
//!
//! # Failure Modes
//!
//! - A listener that mutably re-enters the store while another listener is
//!   reading a snapshot panics on the `RefCell`. Listeners should read, and
//!   write only through the public methods.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use cmdpal_core::{FilterFn, IdAllocator, NodeId, default_filter};
use cmdpal_runtime::{ListenerSet, Scheduler, Selector, Source, Subscription, TurnGuard};

use super::config::CommandConfig;
use super::context::Registry;
use super::state::{SetOptions, Slot, State, StateUpdate};
use super::view::{PresentationOrder, ScrollTarget, ViewModel};

pub(super) struct Inner {
    pub(super) state: RefCell<State>,
    pub(super) registry: RefCell<Registry>,
    pub(super) view: RefCell<ViewModel>,
    pub(super) host: RefCell<Option<Box<dyn PresentationOrder>>>,
    pub(super) config: RefCell<CommandConfig>,
    listeners: ListenerSet,
    pub(super) scheduler: Scheduler<Slot>,
    pub(super) ids: IdAllocator,
    pub(super) label_id: NodeId,
    pub(super) input_id: NodeId,
    pub(super) list_id: NodeId,
    default_filter: FilterFn,
    /// The selected item went away; the next unmount flush reselects.
    pub(super) reselect_pending: Cell<bool>,
    /// The initial selection has not been scrolled into view yet.
    pub(super) initial_scroll_pending: Cell<bool>,
}

/// Handle onto one palette root's shared state.
#[derive(Clone)]
pub struct Store {
    pub(super) inner: Rc<Inner>,
}

impl Store {
    /// Create a root store.
    ///
    /// The initial value is the controlled `value`, else `default_value`,
    /// else nothing.
    #[must_use]
    pub fn new(config: CommandConfig) -> Self {
        let ids = IdAllocator::new();
        let label_id = ids.next_id();
        let input_id = ids.next_id();
        let list_id = ids.next_id();
        let value = config
            .value
            .as_deref()
            .or(config.default_value.as_deref())
            .unwrap_or_default()
            .trim()
            .to_owned();
        let state = State {
            value,
            ..State::default()
        };
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                registry: RefCell::new(Registry::default()),
                view: RefCell::new(ViewModel::new()),
                host: RefCell::new(None),
                config: RefCell::new(config),
                listeners: ListenerSet::new(),
                scheduler: Scheduler::new(),
                ids,
                label_id,
                input_id,
                list_id,
                default_filter: default_filter(),
                reselect_pending: Cell::new(false),
                initial_scroll_pending: Cell::new(true),
            }),
        }
    }

    /// Call `callback` after every committed change.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }

    /// Borrow the current state.
    ///
    /// Drop the guard before calling back into the store.
    #[must_use]
    pub fn snapshot(&self) -> Ref<'_, State> {
        self.inner.state.borrow()
    }

    /// Apply `update` and run its derived effects.
    pub fn set_state(&self, update: StateUpdate, opts: SetOptions) {
        let _turn = self.begin_turn();
        match update {
            StateUpdate::Search(search) => {
                if self.inner.state.borrow().search == search {
                    return;
                }
                self.inner.state.borrow_mut().search = search;
                self.filter_items();
                self.sort();
                self.schedule(Slot::SelectFirst, Store::select_first);
            }
            StateUpdate::Value(value) => {
                if self.inner.state.borrow().value == value {
                    return;
                }
                if !opts.silent {
                    self.schedule(Slot::ScrollSelected, Store::scroll_selected_into_view);
                }
                let (controlled, on_change) = {
                    let config = self.inner.config.borrow();
                    (config.is_controlled(), config.on_value_change.clone())
                };
                if controlled {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(candidate = %value, "value change reported to host");
                    if let Some(on_change) = on_change {
                        on_change(&value);
                    }
                    return;
                }
                self.inner.state.borrow_mut().value = value;
            }
        }
        self.emit();
    }

    /// Change the search text.
    pub fn set_search(&self, search: impl Into<String>) {
        self.set_state(StateUpdate::Search(search.into()), SetOptions::default());
    }

    /// Change the selection and scroll it into view.
    pub fn set_value(&self, value: impl Into<String>) {
        self.set_state(StateUpdate::Value(value.into()), SetOptions::default());
    }

    /// Notify every listener.
    pub fn emit(&self) {
        self.inner.listeners.notify();
    }

    /// Open a turn; pending side effects flush when the outermost guard
    /// drops.
    #[must_use = "the turn ends when the guard drops"]
    pub fn begin_turn(&self) -> TurnGuard<Slot> {
        self.inner.scheduler.begin_turn()
    }

    /// Run pending side effects now.
    pub fn flush(&self) {
        self.inner.scheduler.flush();
    }

    /// The root's scheduler (for inspecting pending slots).
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<Slot> {
        &self.inner.scheduler
    }

    /// Cached projection of the state, refreshed on every emit.
    pub fn select<T>(&self, select: impl Fn(&State) -> T + 'static) -> Selector<T>
    where
        T: Clone + PartialEq + 'static,
    {
        Selector::new(self, select)
    }

    /// Borrow the engine's view model.
    #[must_use]
    pub fn view(&self) -> Ref<'_, ViewModel> {
        self.inner.view.borrow()
    }

    /// Drain the scroll requests recorded by the view model.
    pub fn take_scroll_log(&self) -> Vec<ScrollTarget> {
        self.inner.view.borrow_mut().take_scroll_log()
    }

    /// Install a host presentation controller. Sorting and scrolling are
    /// mirrored onto it after the built-in view model.
    pub fn set_presentation_host(&self, host: impl PresentationOrder + 'static) {
        *self.inner.host.borrow_mut() = Some(Box::new(host));
    }

    /// Remove the host presentation controller.
    pub fn clear_presentation_host(&self) {
        self.inner.host.borrow_mut().take();
    }

    /// Whether the host controls the selected value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.inner.config.borrow().is_controlled()
    }

    /// Allocate an id in this root.
    pub fn allocate_id(&self) -> NodeId {
        self.inner.ids.next_id()
    }

    #[must_use]
    pub fn label_id(&self) -> NodeId {
        self.inner.label_id
    }

    #[must_use]
    pub fn input_id(&self) -> NodeId {
        self.inner.input_id
    }

    #[must_use]
    pub fn list_id(&self) -> NodeId {
        self.inner.list_id
    }

    /// Whether two handles point at the same root.
    #[must_use]
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The configured scoring function, or the default one.
    pub(crate) fn filter_fn(&self) -> FilterFn {
        self.inner
            .config
            .borrow()
            .filter
            .clone()
            .unwrap_or_else(|| Rc::clone(&self.inner.default_filter))
    }

    /// Queue `task` under `slot` for the end of the current turn.
    pub(crate) fn schedule(&self, slot: Slot, task: impl FnOnce(&Store) + 'static) {
        let weak = self.downgrade();
        self.inner.scheduler.schedule(slot, move || {
            if let Some(store) = weak.upgrade() {
                task(&store);
            }
        });
    }

    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Overwrite the displayed value without any side effects beyond a
    /// notification. Used for host-fed controlled values.
    pub(crate) fn replace_value(&self, value: String) {
        let _turn = self.begin_turn();
        self.inner.state.borrow_mut().value = value;
        self.emit();
    }
}

impl Source for Store {
    type State = State;

    fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Store")
            .field("root", &self.inner.ids.root())
            .field("search", &state.search)
            .field("value", &state.value)
            .field("count", &state.filtered.count)
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

/// Non-owning store handle held by registrations and scheduled tasks.
#[derive(Clone)]
pub(crate) struct WeakStore {
    inner: Weak<Inner>,
}

impl WeakStore {
    pub(crate) fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}
