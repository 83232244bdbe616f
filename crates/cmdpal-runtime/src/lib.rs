#![forbid(unsafe_code)]

//! Reactive plumbing for cmdpal.
//!
//! - [`reactive`]: listener sets with RAII [`Subscription`]s, and selector
//!   bindings that re-read shared state when it emits.
//! - [`schedule`]: the slot-keyed coalescing [`Scheduler`] that defers side
//!   effects to the end of the current turn.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); none of these types
//! are `Send`.

pub mod reactive;
pub mod schedule;

pub use reactive::{ListenerSet, Selector, Source, Subscription};
pub use schedule::{Scheduler, TurnGuard};
