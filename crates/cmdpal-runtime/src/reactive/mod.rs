#![forbid(unsafe_code)]

//! Reactive primitives for palette state.
//!
//! - [`ListenerSet`]: the subscriber list behind a store's `emit()`.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Source`]: anything that owns state plus a [`ListenerSet`].
//! - [`Selector`]: a cached projection that re-selects on every emit and
//!   reports whether the projected value changed.
//!
//! # Architecture
//!
//! Listener lists are `Rc<RefCell<..>>` owned by the source. A
//! [`Subscription`] keeps only a `Weak` handle to the list, so dropping the
//! source first leaves the guard inert instead of keeping the list alive.
//!
//! # Invariants
//!
//! 1. Listeners run in registration order.
//! 2. A listener removed during a notification does not run in later
//!    notifications; the in-flight pass uses the list as it was when the
//!    pass started.
//! 3. No `RefCell` borrow of the list is held while a listener runs, so
//!    listeners may subscribe or unsubscribe freely.
//! 4. `Selector::get()` never returns a value older than the last emit.

pub mod selector;
pub mod subscription;

pub use selector::{Selector, Source};
pub use subscription::{ListenerSet, Subscription};
