#![forbid(unsafe_code)]

//! Root configuration.
//!
//! [`CommandConfig`] is everything a host passes to a palette root,
//! callbacks included. Its plain-data part, [`CommandOptions`], can be
//! loaded from TOML or JSON with the `config` feature.

use core::fmt;
use std::rc::Rc;

use cmdpal_core::FilterFn;

/// Callback receiving a string value (selection or search).
pub type ValueCallback = Rc<dyn Fn(&str)>;

/// Root configuration.
#[derive(Clone)]
pub struct CommandConfig {
    /// Accessible label for the palette.
    pub label: Option<String>,
    /// Filter and sort automatically. Disable when the host filters itself.
    pub should_filter: bool,
    /// Custom scoring function; the default is [`cmdpal_core::command_score`].
    pub filter: Option<FilterFn>,
    /// Initial selection when uncontrolled.
    pub default_value: Option<String>,
    /// Controlled selection. When set, the palette only reports candidate
    /// values through `on_value_change` and displays whatever the host feeds
    /// back.
    pub value: Option<String>,
    pub on_value_change: Option<ValueCallback>,
    /// Wrap around at either end when moving by item.
    pub loop_navigation: bool,
    /// Ignore pointer movement for selection.
    pub disable_pointer_selection: bool,
    /// Ctrl+N/J/P/K move the selection.
    pub vim_bindings: bool,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            label: None,
            should_filter: true,
            filter: None,
            default_value: None,
            value: None,
            on_value_change: None,
            loop_navigation: false,
            disable_pointer_selection: false,
            vim_bindings: true,
        }
    }
}

impl CommandConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn should_filter(mut self, on: bool) -> Self {
        self.should_filter = on;
        self
    }

    #[must_use]
    pub fn filter(mut self, f: impl Fn(&str, &str, &[String]) -> f64 + 'static) -> Self {
        self.filter = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Put the selection under host control.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn on_value_change(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_value_change = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn loop_navigation(mut self, on: bool) -> Self {
        self.loop_navigation = on;
        self
    }

    #[must_use]
    pub fn disable_pointer_selection(mut self, on: bool) -> Self {
        self.disable_pointer_selection = on;
        self
    }

    #[must_use]
    pub fn vim_bindings(mut self, on: bool) -> Self {
        self.vim_bindings = on;
        self
    }

    /// Overlay plain options onto this config.
    #[must_use]
    pub fn with_options(mut self, options: &CommandOptions) -> Self {
        if let Some(label) = &options.label {
            self.label = Some(label.clone());
        }
        if let Some(value) = &options.default_value {
            self.default_value = Some(value.clone());
        }
        self.should_filter = options.should_filter;
        self.loop_navigation = options.loop_navigation;
        self.disable_pointer_selection = options.disable_pointer_selection;
        self.vim_bindings = options.vim_bindings;
        self
    }

    pub(crate) fn is_controlled(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Debug for CommandConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandConfig")
            .field("label", &self.label)
            .field("should_filter", &self.should_filter)
            .field("custom_filter", &self.filter.is_some())
            .field("default_value", &self.default_value)
            .field("value", &self.value)
            .field("loop_navigation", &self.loop_navigation)
            .field("disable_pointer_selection", &self.disable_pointer_selection)
            .field("vim_bindings", &self.vim_bindings)
            .finish()
    }
}

/// Serializable subset of [`CommandConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, deny_unknown_fields)
)]
pub struct CommandOptions {
    pub label: Option<String>,
    pub should_filter: bool,
    #[cfg_attr(feature = "config", serde(rename = "loop"))]
    pub loop_navigation: bool,
    pub disable_pointer_selection: bool,
    pub vim_bindings: bool,
    pub default_value: Option<String>,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            label: None,
            should_filter: true,
            loop_navigation: false,
            disable_pointer_selection: false,
            vim_bindings: true,
            default_value: None,
        }
    }
}

#[cfg(feature = "config")]
impl CommandOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Parse options from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

/// Failure to load [`CommandOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Toml(String),
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(msg) => write!(f, "invalid palette options (toml): {msg}"),
            Self::Json(msg) => write!(f, "invalid palette options (json): {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_filter_with_vim_bindings() {
        let cfg = CommandConfig::default();
        assert!(cfg.should_filter);
        assert!(cfg.vim_bindings);
        assert!(!cfg.loop_navigation);
        assert!(!cfg.is_controlled());
    }

    #[test]
    fn builder_sets_controlled_value() {
        let cfg = CommandConfig::new().value("apple");
        assert!(cfg.is_controlled());
        assert_eq!(cfg.value.as_deref(), Some("apple"));
    }

    #[test]
    fn options_overlay() {
        let opts = CommandOptions {
            label: Some("Commands".into()),
            loop_navigation: true,
            vim_bindings: false,
            ..CommandOptions::default()
        };
        let cfg = CommandConfig::new().with_options(&opts);
        assert_eq!(cfg.label.as_deref(), Some("Commands"));
        assert!(cfg.loop_navigation);
        assert!(!cfg.vim_bindings);
        assert!(cfg.should_filter);
    }

    #[test]
    fn debug_hides_closures() {
        let cfg = CommandConfig::new().filter(|_, _, _| 1.0);
        let debug = format!("{cfg:?}");
        assert!(debug.contains("custom_filter: true"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Json("expected value".into());
        assert!(err.to_string().contains("json"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn options_from_toml() {
        let opts = CommandOptions::from_toml_str(
            r#"
            label = "Go to"
            loop = true
            default_value = "home"
            "#,
        )
        .expect("valid toml");
        assert_eq!(opts.label.as_deref(), Some("Go to"));
        assert!(opts.loop_navigation);
        assert!(opts.should_filter);
        assert_eq!(opts.default_value.as_deref(), Some("home"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn options_from_json_rejects_unknown_fields() {
        let err = CommandOptions::from_json_str(r#"{"loop": true, "colour": "red"}"#)
            .expect_err("unknown field");
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
