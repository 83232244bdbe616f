#![forbid(unsafe_code)]

//! Headless command-menu components for cmdpal.
//!
//! See [`command`] for the component model. Rendering produces
//! [`cmdpal_a11y::Element`] trees; hosts map them onto their own UI.

pub mod command;

pub use command::{
    Command, CommandConfig, CommandOptions, ConfigError, Dialog, DialogProps, Empty, Group,
    GroupProps, Input, InputProps, Item, ItemProps, List, ListProps, Loading, LoadingProps,
    PresentationOrder, ScrollTarget, Separator, SeparatorProps, State, Store,
};
