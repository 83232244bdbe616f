#![forbid(unsafe_code)]

//! Accessibility contract for cmdpal.
//!
//! Hosts style and test palettes by the attributes they render, so these
//! names are a compatibility surface: the `cmdk-*` markers, the ARIA roles,
//! and the `data-*` state attributes must match byte for byte.
//!
//! - [`Role`]: the ARIA roles palette parts render with.
//! - [`marker`]: the empty-valued `cmdk-*` part markers.
//! - [`attr`]: ARIA and data attribute names.
//! - [`Attributes`]: an insertion-ordered attribute list.
//! - [`Element`]: a rendered node (tag, attributes, text, children).

pub mod element;
pub mod role;

pub use element::{Attributes, Element};
pub use role::Role;

/// Empty-valued part markers (`cmdk-item=""` and friends).
pub mod marker {
    pub const ROOT: &str = "cmdk-root";
    pub const LABEL: &str = "cmdk-label";
    pub const INPUT: &str = "cmdk-input";
    pub const LIST: &str = "cmdk-list";
    pub const LIST_SIZER: &str = "cmdk-list-sizer";
    pub const ITEM: &str = "cmdk-item";
    pub const GROUP: &str = "cmdk-group";
    pub const GROUP_HEADING: &str = "cmdk-group-heading";
    pub const GROUP_ITEMS: &str = "cmdk-group-items";
    pub const SEPARATOR: &str = "cmdk-separator";
    pub const EMPTY: &str = "cmdk-empty";
    pub const LOADING: &str = "cmdk-loading";
    pub const DIALOG: &str = "cmdk-dialog";
    pub const OVERLAY: &str = "cmdk-overlay";
}

/// Attribute names.
pub mod attr {
    pub const ID: &str = "id";
    pub const ROLE: &str = "role";
    pub const HIDDEN: &str = "hidden";
    pub const STYLE: &str = "style";
    pub const TAB_INDEX: &str = "tabindex";
    pub const FOR: &str = "for";
    pub const TYPE: &str = "type";
    pub const VALUE: &str = "value";
    pub const AUTOCOMPLETE: &str = "autocomplete";
    pub const AUTOCORRECT: &str = "autocorrect";
    pub const SPELLCHECK: &str = "spellcheck";

    pub const ARIA_LABEL: &str = "aria-label";
    pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
    pub const ARIA_CONTROLS: &str = "aria-controls";
    pub const ARIA_EXPANDED: &str = "aria-expanded";
    pub const ARIA_AUTOCOMPLETE: &str = "aria-autocomplete";
    pub const ARIA_ACTIVEDESCENDANT: &str = "aria-activedescendant";
    pub const ARIA_SELECTED: &str = "aria-selected";
    pub const ARIA_DISABLED: &str = "aria-disabled";
    pub const ARIA_HIDDEN: &str = "aria-hidden";
    pub const ARIA_VALUENOW: &str = "aria-valuenow";
    pub const ARIA_VALUEMIN: &str = "aria-valuemin";
    pub const ARIA_VALUEMAX: &str = "aria-valuemax";

    pub const DATA_VALUE: &str = "data-value";
    pub const DATA_SELECTED: &str = "data-selected";
    pub const DATA_DISABLED: &str = "data-disabled";

    /// Custom property carrying the measured list content height.
    pub const LIST_HEIGHT_VAR: &str = "--cmdk-list-height";
}

/// Inline style that hides content visually but keeps it for screen readers.
pub const SR_ONLY_STYLE: &str = "position: absolute; width: 1px; height: 1px; padding: 0; \
margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border-width: 0";
