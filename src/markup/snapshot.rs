use crate::markup::matcher::SelectorMatcher;
use scraper::{Html, Selector};

/// Rendered state of the presentation at one point in time
///
/// The markup is parsed once on construction; every selector query runs
/// against that parse. Snapshots are never updated, a fresh one is taken
/// before each decision.
pub struct MarkupSnapshot {
    source: String,
    document: Html,
}

impl MarkupSnapshot {
    /// Parse a snapshot from the document's outer HTML
    pub fn parse(markup: impl Into<String>) -> Self {
        let source = markup.into();
        let document = Html::parse_document(&source);
        Self { source, document }
    }

    /// The raw markup text
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Whether `selector` parses as a CSS selector
///
/// Invalid selectors are accepted by the rules and simply never match.
pub fn is_valid_selector(selector: &str) -> bool {
    Selector::parse(selector).is_ok()
}

impl std::fmt::Debug for MarkupSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupSnapshot").field("len", &self.source.len()).finish()
    }
}

impl SelectorMatcher for MarkupSnapshot {
    fn matches(&self, selector: &str) -> bool {
        match Selector::parse(selector) {
            Ok(parsed) => self.document.select(&parsed).next().is_some(),
            Err(e) => {
                log::debug!("Ignoring invalid selector '{}': {}", selector, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVEAL_MIDDLE: &str = r#"
        <html><body>
          <div class="reveal">
            <div class="slides">
              <section class="past"></section>
              <section class="present"></section>
              <section class="future"></section>
            </div>
            <aside class="controls">
              <button class="navigate-right enabled"></button>
              <button class="navigate-down"></button>
            </aside>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_compound_class_selectors() {
        let snapshot = MarkupSnapshot::parse(REVEAL_MIDDLE);

        assert!(snapshot.matches(".future"));
        assert!(snapshot.matches(".navigate-right.enabled"));
        assert!(snapshot.matches(".navigate-down"));
        assert!(!snapshot.matches(".navigate-down.enabled"));
        assert!(!snapshot.matches(".slide.far-future"));
    }

    #[test]
    fn test_invalid_selector_never_matches() {
        let snapshot = MarkupSnapshot::parse(REVEAL_MIDDLE);
        assert!(!snapshot.matches("section[["));
        assert!(!snapshot.matches(""));
    }

    #[test]
    fn test_selector_validity() {
        assert!(is_valid_selector(".navigate-right.enabled"));
        assert!(is_valid_selector("section[data-state='last']"));
        assert!(!is_valid_selector("section[["));
        assert!(!is_valid_selector(""));
    }

    #[test]
    fn test_snapshot_keeps_source() {
        let snapshot = MarkupSnapshot::parse("<p class='x'>hi</p>");
        assert_eq!(snapshot.as_str(), "<p class='x'>hi</p>");
        assert!(snapshot.matches("p.x"));
    }
}
