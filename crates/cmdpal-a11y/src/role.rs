#![forbid(unsafe_code)]

use core::fmt;

/// ARIA roles rendered by palette parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The search input.
    Combobox,
    /// The result list.
    Listbox,
    /// A selectable item.
    Option,
    /// Structural wrappers (groups, the empty state).
    Presentation,
    /// The loading indicator.
    Progressbar,
    Separator,
    /// The items container inside a group.
    Group,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Combobox => "combobox",
            Self::Listbox => "listbox",
            Self::Option => "option",
            Self::Presentation => "presentation",
            Self::Progressbar => "progressbar",
            Self::Separator => "separator",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_match_aria() {
        let all = [
            (Role::Combobox, "combobox"),
            (Role::Listbox, "listbox"),
            (Role::Option, "option"),
            (Role::Presentation, "presentation"),
            (Role::Progressbar, "progressbar"),
            (Role::Separator, "separator"),
            (Role::Group, "group"),
        ];
        for (role, name) in all {
            assert_eq!(role.as_str(), name);
            assert_eq!(role.to_string(), name);
        }
    }
}
