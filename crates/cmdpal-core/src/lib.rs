#![forbid(unsafe_code)]

//! Core types for cmdpal: node identity, key events, and match scoring.
//!
//! Everything in this crate is free of shared state. The stateful engine
//! (store, registry, filter, sort, navigation) lives in `cmdpal-widgets`
//! and the reactive plumbing it is built on lives in `cmdpal-runtime`.

pub mod event;
pub mod id;
pub mod score;

pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use id::{IdAllocator, NodeId};
pub use score::{FilterFn, command_score, default_filter};
