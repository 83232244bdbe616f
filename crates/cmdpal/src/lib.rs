#![forbid(unsafe_code)]

//! cmdpal: a headless command menu.
//!
//! Re-exports the component crates under one name. Most hosts only need the
//! [`prelude`]:
//!
//! ```
//! use cmdpal::prelude::*;
//!
//! let cmd = Command::new(CommandConfig::new().label("Command menu"));
//! let input = cmd.input(InputProps::new());
//! let _open = cmd.item(ItemProps::new().value("Open file"));
//! let _quit = cmd.item(ItemProps::new().value("Quit"));
//!
//! input.change("qu");
//! assert_eq!(cmd.store().snapshot().value, "Quit");
//! ```

pub use cmdpal_a11y as a11y;
pub use cmdpal_runtime as runtime;
pub use cmdpal_widgets as widgets;

pub use cmdpal_core::{FilterFn, KeyCode, KeyEvent, Modifiers, NodeId, command_score};
pub use cmdpal_widgets::command::{
    Command, CommandConfig, CommandOptions, ConfigError, Dialog, DialogProps, Direction, Empty,
    Group, GroupProps, Input, InputProps, Item, ItemProps, KeyAction, List, ListProps, Loading,
    LoadingProps, PresentationOrder, ScrollTarget, Separator, SeparatorProps, State, Store,
};

/// Everything a host needs to build and drive a palette.
pub mod prelude {
    pub use cmdpal_a11y::{Element, Role};
    pub use cmdpal_core::{KeyCode, KeyEvent, Modifiers};
    pub use cmdpal_widgets::command::{
        Command, CommandConfig, Dialog, DialogProps, Empty, Group, GroupProps, Input,
        InputProps, Item, ItemProps, List, ListProps, Loading, LoadingProps, PresentationOrder,
        Separator, SeparatorProps,
    };
}
