use std::collections::HashSet;

/// Answers whether a selector matches at least one element
pub trait SelectorMatcher {
    fn matches(&self, selector: &str) -> bool;
}

impl<T: SelectorMatcher + ?Sized> SelectorMatcher for &T {
    fn matches(&self, selector: &str) -> bool {
        (**self).matches(selector)
    }
}

/// Matcher over a fixed set of selectors known to be present
///
/// Matching is by exact selector text, no CSS semantics. Used to drive the
/// rule evaluators without rendering any HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet {
    present: HashSet<String>,
}

impl SelectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: mark a selector as present
    pub fn with(mut self, selector: impl Into<String>) -> Self {
        self.present.insert(selector.into());
        self
    }

    pub fn remove(&mut self, selector: &str) -> bool {
        self.present.remove(selector)
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { present: iter.into_iter().map(Into::into).collect() }
    }
}

impl SelectorMatcher for SelectorSet {
    fn matches(&self, selector: &str) -> bool {
        self.present.contains(selector)
    }
}
