#![forbid(unsafe_code)]

//! Rendered nodes.
//!
//! [`Element`] is what palette components hand to the host: a tag, an
//! insertion-ordered [`Attributes`] list, optional text, and children. Hosts
//! either translate it into their own node type or diff it directly.

use core::fmt::Write as _;

use cmdpal_core::NodeId;

use crate::Role;
use crate::attr;

/// Insertion-ordered attribute list. Setting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(&'static str, String)>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
        self
    }

    /// Set `name` to `value` (builder).
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set `name` only when `value` is present (builder).
    #[must_use]
    pub fn with_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Add an empty-valued part marker such as `cmdk-item` (builder).
    #[must_use]
    pub fn marker(self, name: &'static str) -> Self {
        self.with(name, "")
    }

    /// Set `role` (builder).
    #[must_use]
    pub fn role(self, role: Role) -> Self {
        self.with(attr::ROLE, role.as_str())
    }

    /// Set a boolean attribute rendered as `"true"`/`"false"` (builder).
    #[must_use]
    pub fn flag(self, name: &'static str, on: bool) -> Self {
        self.with(name, if on { "true" } else { "false" })
    }

    /// Set an id-reference attribute (builder).
    #[must_use]
    pub fn node(self, name: &'static str, id: NodeId) -> Self {
        self.with(name, id.to_string())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Attributes,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &'static str, attrs: Attributes) -> Self {
        Self {
            tag,
            attrs,
            text: None,
            children: Vec::new(),
        }
    }

    /// A `div` with `attrs`.
    #[must_use]
    pub fn div(attrs: Attributes) -> Self {
        Self::new("div", attrs)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Shorthand for `self.attrs.get(name)`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// First node (self included, depth first) carrying `marker`.
    #[must_use]
    pub fn find(&self, marker: &str) -> Option<&Element> {
        if self.attrs.has(marker) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(marker))
    }

    /// Every node (self included, depth first) carrying `marker`.
    #[must_use]
    pub fn find_all(&self, marker: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect(marker, &mut out);
        out
    }

    fn collect<'a>(&'a self, marker: &str, out: &mut Vec<&'a Element>) {
        if self.attrs.has(marker) {
            out.push(self);
        }
        for child in &self.children {
            child.collect(marker, out);
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.push_text(out);
        }
    }

    /// Serialize as HTML-like markup (for snapshots and debugging).
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in self.attrs.iter() {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
