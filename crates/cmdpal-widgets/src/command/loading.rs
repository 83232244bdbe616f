#![forbid(unsafe_code)]

//! Loading indicator (progressbar).

use cmdpal_a11y::{Attributes, Element, Role, attr, marker};

/// Accessible label used when none is given.
pub const DEFAULT_LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingProps {
    /// Percentage in `0..=100`, when known.
    pub progress: Option<f64>,
    pub label: Option<String>,
    /// Visible content, hidden from assistive technology.
    pub text: Option<String>,
}

impl LoadingProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loading {
    props: LoadingProps,
}

impl Loading {
    pub(crate) fn mount(props: LoadingProps) -> Self {
        Self { props }
    }

    pub fn set_progress(&mut self, progress: Option<f64>) {
        self.props.progress = progress;
    }

    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.props.progress
    }

    #[must_use]
    pub fn render(&self) -> Element {
        let label = self.props.label.as_deref().unwrap_or(DEFAULT_LOADING_LABEL);
        let attrs = Attributes::new()
            .marker(marker::LOADING)
            .role(Role::Progressbar)
            .with_opt(attr::ARIA_VALUENOW, self.props.progress.map(|p| p.to_string()))
            .with(attr::ARIA_VALUEMIN, "0")
            .with(attr::ARIA_VALUEMAX, "100")
            .with(attr::ARIA_LABEL, label);
        let mut content = Element::div(Attributes::new().flag(attr::ARIA_HIDDEN, true));
        if let Some(text) = &self.props.text {
            content = content.with_text(text.clone());
        }
        Element::div(attrs).with_child(content)
    }
}
