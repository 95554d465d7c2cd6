//! Navigation resolution
//!
//! Picks the key to press to reach the next slide, either from a
//! priority-ordered [`NavigationTable`] or from the built-in rule
//! (down when vertical navigation is available, right otherwise).

use crate::{markup::SelectorMatcher, rules::Diagnostic};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Combined selector reveal.js uses when a vertical sub-slide is reachable
pub const DOWN_ENABLED_SELECTOR: &str = ".navigate-down.enabled";

/// Named navigation command, delivered to the page as a key press
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Action(String);

impl Action {
    pub const RIGHT_KEY: &'static str = "ArrowRight";
    pub const DOWN_KEY: &'static str = "ArrowDown";

    /// Create an action from a key name
    ///
    /// Short direction names (`right`, `down`, `left`, `up`) map to the
    /// corresponding arrow keys; anything else is used as the key name verbatim.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = match name.trim().to_ascii_lowercase().as_str() {
            "right" => Self::RIGHT_KEY.to_string(),
            "down" => Self::DOWN_KEY.to_string(),
            "left" => "ArrowLeft".to_string(),
            "up" => "ArrowUp".to_string(),
            _ => name.trim().to_string(),
        };
        Self(key)
    }

    pub fn right() -> Self {
        Self(Self::RIGHT_KEY.to_string())
    }

    pub fn down() -> Self {
        Self(Self::DOWN_KEY.to_string())
    }

    /// Key name to dispatch
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a navigation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub selector: String,
    pub action: Action,
}

/// Validated, non-empty list of selector/action pairs in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTable {
    entries: Vec<NavEntry>,
}

impl NavigationTable {
    /// Validate a table as written in configuration
    ///
    /// Every row must hold exactly a non-blank selector and action, and there must be
    /// at least one row. The first problem found is reported.
    pub fn from_raw(raw: &[Vec<String>]) -> Result<Self, Diagnostic> {
        if raw.is_empty() {
            return Err(Diagnostic::EmptyNavigationTable);
        }

        let mut entries = Vec::with_capacity(raw.len());
        for (position, row) in raw.iter().enumerate() {
            let [selector, action] = row.as_slice() else {
                return Err(Diagnostic::MalformedNavigationEntry { position, len: row.len() });
            };
            if selector.trim().is_empty() || action.trim().is_empty() {
                return Err(Diagnostic::BlankNavigationEntry { position });
            }

            entries.push(NavEntry { selector: selector.clone(), action: Action::new(action.as_str()) });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Action of the first entry whose selector matches
    pub fn lookup(&self, markup: &impl SelectorMatcher) -> Option<&Action> {
        self.entries.iter().find(|entry| markup.matches(&entry.selector)).map(|entry| &entry.action)
    }
}

/// Built-in rule used when no table is configured
pub fn default_action(markup: &impl SelectorMatcher) -> Action {
    if markup.matches(DOWN_ENABLED_SELECTOR) { Action::down() } else { Action::right() }
}

/// Choose the next navigation action for the current slide
pub fn next_action(markup: &impl SelectorMatcher, table: Option<&NavigationTable>) -> Action {
    match table {
        Some(table) => table.lookup(markup).cloned().unwrap_or_else(Action::right),
        None => default_action(markup),
    }
}
