//! Markup snapshots and selector matching
//!
//! A snapshot is the rendered document at one instant. Every decision the
//! traversal makes is a question of the form "does this selector match
//! anything in the current snapshot", answered through [`SelectorMatcher`].

pub mod matcher;
pub mod snapshot;

pub use matcher::{SelectorMatcher, SelectorSet};
pub use snapshot::{MarkupSnapshot, is_valid_selector};
