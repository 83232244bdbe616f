#![forbid(unsafe_code)]

//! Headless command menu.
//!
//! A palette is a [`Command`] root plus the parts mounted on it: an
//! [`Input`], a [`List`], [`Item`]s, [`Group`]s, [`Separator`]s, and the
//! [`Empty`] and [`Loading`] states. [`Dialog`] wraps a root in a modal.
//!
//! Every part shares the root's [`Store`]. Mutations made within one turn
//! (see [`Store::begin_turn`]) are coalesced: filtering, sorting, and
//! reselection run once when the outermost turn ends, and subscribers are
//! notified after that.
//!
//! # Invariants
//!
//! - `state.filtered.count` equals the number of registered items whose
//!   score is above zero, or all registered items when the search is empty
//!   or filtering is off.
//! - The selected value is empty or the value of some rendered item, except
//!   briefly inside a turn.
//! - Sorting only reorders; items never leave their group.
//!
//! # Failure Modes
//!
//! - A duplicate registration returns an inert guard and logs nothing.
//! - Flushes scheduled by a dropped root do nothing.
//! - Callbacks may re-enter the store; no state borrow is held across them.

mod config;
mod context;
mod dialog;
mod empty;
mod filter;
mod group;
mod input;
mod item;
mod keyboard;
mod list;
mod loading;
mod navigation;
mod root;
mod separator;
mod sort;
mod state;
mod store;
mod view;

pub use config::{CommandConfig, CommandOptions, ConfigError, ValueCallback};
pub use context::{GroupRegistration, ItemRegistration, Registry, ValueEntry};
pub use dialog::{Dialog, DialogParts, DialogProps};
pub use empty::Empty;
pub use group::{Group, GroupProps};
pub use input::{Input, InputProps};
pub use item::{Item, ItemProps};
pub use keyboard::{KeyAction, map_key};
pub use list::{DEFAULT_LIST_LABEL, List, ListProps};
pub use loading::{DEFAULT_LOADING_LABEL, Loading, LoadingProps};
pub use navigation::Direction;
pub use root::Command;
pub use separator::{Separator, SeparatorProps};
pub use state::{Filtered, SetOptions, Slot, State, StateUpdate};
pub use store::Store;
pub use view::{
    Entry, GroupNode, ItemNode, PresentationOrder, SCROLL_LOG_CAPACITY, ScrollTarget,
    SeparatorNode, ViewModel,
};
