//! Stopping-condition evaluation
//!
//! Decides from the current markup whether the slide on screen is the last
//! one. Either a user-supplied [`CustomRule`] is folded over its queries, or
//! the built-in forward-marker policies of the supported frameworks apply.

use crate::markup::SelectorMatcher;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Boolean operator used to fold a custom rule's queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// Parse an operator name (`AND`, `OR`, `&&`, `||`, any case)
    ///
    /// Returns None for anything else; callers fall back to [`Operator::Or`].
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "AND" | "&&" => Some(Operator::And),
            "OR" | "||" => Some(Operator::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => f.write_str("AND"),
            Operator::Or => f.write_str("OR"),
        }
    }
}

/// Stopping rule exactly as written in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StopRuleConfig {
    /// "AND" or "OR"; missing means OR
    #[serde(default)]
    pub operator: Option<String>,

    /// Invert each query's match result before folding
    #[serde(default)]
    pub reverse: bool,

    /// Selectors to test against the current slide
    #[serde(default)]
    pub queries: Vec<String>,
}

/// Validated user stopping rule; always has at least one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRule {
    operator: Operator,
    reverse: bool,
    queries: Vec<String>,
}

impl CustomRule {
    /// Build a rule, or None when `queries` is empty
    pub fn new(operator: Operator, reverse: bool, queries: Vec<String>) -> Option<Self> {
        if queries.is_empty() {
            return None;
        }
        Some(Self { operator, reverse, queries })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn evaluate(&self, markup: &impl SelectorMatcher) -> bool {
        fold_queries(markup, self.operator, self.reverse, &self.queries)
    }
}

/// Fold the per-query match results with `operator`
///
/// With `reverse` a query counts as a hit when its selector is absent.
/// AND starts from true and OR from false; both stop at the first deciding query.
pub fn fold_queries(markup: &impl SelectorMatcher, operator: Operator, reverse: bool, queries: &[String]) -> bool {
    let hit = |query: &String| markup.matches(query) != reverse;

    match operator {
        Operator::And => queries.iter().all(hit),
        Operator::Or => queries.iter().any(hit),
    }
}

/// Selectors whose presence means html5slides-style decks have slides ahead
pub const HTML5SLIDES_FORWARD_MARKERS: &[&str] = &[".slide.far-future", ".slide.future"];

/// Selectors whose presence means a reveal.js deck has slides ahead
pub const REVEAL_FORWARD_MARKERS: &[&str] = &[".future", ".navigate-right.enabled", ".navigate-down.enabled"];

/// Slide framework with a built-in end-of-deck policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    Html5Slides,
    Reveal,
}

impl Framework {
    pub const ALL: [Framework; 2] = [Framework::Html5Slides, Framework::Reveal];

    pub fn name(self) -> &'static str {
        match self {
            Framework::Html5Slides => "html5slides",
            Framework::Reveal => "reveal",
        }
    }

    /// Selectors marking "more slides ahead" under this framework's convention
    pub fn forward_markers(self) -> &'static [&'static str] {
        match self {
            Framework::Html5Slides => HTML5SLIDES_FORWARD_MARKERS,
            Framework::Reveal => REVEAL_FORWARD_MARKERS,
        }
    }

    /// Selector whose presence identifies a deck built on this framework
    pub fn detection_selector(self) -> &'static str {
        match self {
            Framework::Html5Slides => ".slide",
            Framework::Reveal => ".reveal",
        }
    }

    /// True when none of the forward markers are present
    pub fn is_terminal(self, markup: &impl SelectorMatcher) -> bool {
        self.forward_markers().iter().all(|selector| !markup.matches(selector))
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which built-in policy to use, as configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FrameworkMode {
    /// Every framework's policy must report the end
    #[default]
    Combined,
    /// Pick the policy of the framework detected on the first slide
    Auto,
    Reveal,
    Html5slides,
}

impl FrameworkMode {
    /// Resolve to a concrete policy using the deck's first snapshot
    pub fn resolve(self, initial: &impl SelectorMatcher) -> FrameworkPolicy {
        match self {
            FrameworkMode::Combined => FrameworkPolicy::Combined,
            FrameworkMode::Reveal => FrameworkPolicy::Only(Framework::Reveal),
            FrameworkMode::Html5slides => FrameworkPolicy::Only(Framework::Html5Slides),
            FrameworkMode::Auto => {
                let detected: Vec<Framework> =
                    Framework::ALL.into_iter().filter(|fw| initial.matches(fw.detection_selector())).collect();

                match detected.as_slice() {
                    [framework] => {
                        log::info!("Detected {} deck", framework);
                        FrameworkPolicy::Only(*framework)
                    }
                    _ => {
                        log::info!("Could not detect a single slide framework, using combined end detection");
                        FrameworkPolicy::Combined
                    }
                }
            }
        }
    }
}

impl FromStr for FrameworkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(FrameworkMode::Combined),
            "auto" => Ok(FrameworkMode::Auto),
            "reveal" => Ok(FrameworkMode::Reveal),
            "html5slides" => Ok(FrameworkMode::Html5slides),
            other => Err(format!("unknown framework '{}'", other)),
        }
    }
}

/// Resolved built-in policy for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkPolicy {
    /// All frameworks' forward markers must be gone
    Combined,
    Only(Framework),
}

impl FrameworkPolicy {
    pub fn is_terminal(self, markup: &impl SelectorMatcher) -> bool {
        match self {
            FrameworkPolicy::Combined => Framework::ALL.iter().all(|fw| fw.is_terminal(markup)),
            FrameworkPolicy::Only(framework) => framework.is_terminal(markup),
        }
    }
}

/// Rule deciding when traversal ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoppingRule {
    Framework(FrameworkPolicy),
    Custom(CustomRule),
}

impl Default for StoppingRule {
    fn default() -> Self {
        StoppingRule::Framework(FrameworkPolicy::Combined)
    }
}

/// Whether the current slide is the last one
///
/// Once `already_ended` is set the markup is not consulted again.
pub fn is_end(markup: &impl SelectorMatcher, already_ended: bool, rule: &StoppingRule) -> bool {
    if already_ended {
        return true;
    }

    match rule {
        StoppingRule::Custom(custom) => custom.evaluate(markup),
        StoppingRule::Framework(policy) => policy.is_terminal(markup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{MarkupSnapshot, SelectorSet};
    use std::cell::RefCell;

    fn queries(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Records every selector it is asked about
    struct Recording {
        present: SelectorSet,
        asked: RefCell<Vec<String>>,
    }

    impl SelectorMatcher for Recording {
        fn matches(&self, selector: &str) -> bool {
            self.asked.borrow_mut().push(selector.to_string());
            self.present.matches(selector)
        }
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(Operator::parse("AND"), Some(Operator::And));
        assert_eq!(Operator::parse(" and "), Some(Operator::And));
        assert_eq!(Operator::parse("&&"), Some(Operator::And));
        assert_eq!(Operator::parse("Or"), Some(Operator::Or));
        assert_eq!(Operator::parse("||"), Some(Operator::Or));
        assert_eq!(Operator::parse("XOR"), None);
        assert_eq!(Operator::parse(""), None);
    }

    #[test]
    fn test_custom_rule_requires_queries() {
        assert!(CustomRule::new(Operator::And, false, Vec::new()).is_none());
        assert!(CustomRule::new(Operator::And, false, queries(&[".last"])).is_some());
    }

    #[test]
    fn test_and_short_circuits_on_first_miss() {
        let markup = Recording { present: SelectorSet::new().with(".c"), asked: RefCell::new(Vec::new()) };

        let result = fold_queries(&markup, Operator::And, false, &queries(&[".a", ".b", ".c"]));

        assert!(!result);
        assert_eq!(*markup.asked.borrow(), vec![".a".to_string()]);
    }

    #[test]
    fn test_or_short_circuits_on_first_hit() {
        let markup = Recording { present: SelectorSet::new().with(".a"), asked: RefCell::new(Vec::new()) };

        let result = fold_queries(&markup, Operator::Or, false, &queries(&[".a", ".b"]));

        assert!(result);
        assert_eq!(*markup.asked.borrow(), vec![".a".to_string()]);
    }

    #[test]
    fn test_and_requires_all() {
        let markup = SelectorSet::new().with(".a").with(".b");
        assert!(fold_queries(&markup, Operator::And, false, &queries(&[".a", ".b"])));
        assert!(!fold_queries(&markup, Operator::And, false, &queries(&[".a", ".b", ".c"])));
    }

    #[test]
    fn test_or_with_no_hits_is_false() {
        let markup = SelectorSet::new();
        assert!(!fold_queries(&markup, Operator::Or, false, &queries(&[".a", ".b"])));
    }

    #[test]
    fn test_reverse_single_query_and() {
        let rule = CustomRule::new(Operator::And, true, queries(&[".next-slide"])).unwrap();

        assert!(rule.evaluate(&SelectorSet::new()));
        assert!(!rule.evaluate(&SelectorSet::new().with(".next-slide")));
    }

    #[test]
    fn test_reverse_or_hits_on_any_absent() {
        let markup = SelectorSet::new().with(".a");
        assert!(fold_queries(&markup, Operator::Or, true, &queries(&[".a", ".b"])));
        assert!(!fold_queries(&markup, Operator::Or, true, &queries(&[".a"])));
    }

    #[test]
    fn test_framework_default_end_on_bare_markup() {
        let rule = StoppingRule::default();
        assert!(is_end(&SelectorSet::new(), false, &rule));
    }

    #[test]
    fn test_framework_default_any_forward_marker_blocks_end() {
        let rule = StoppingRule::default();

        for marker in HTML5SLIDES_FORWARD_MARKERS.iter().chain(REVEAL_FORWARD_MARKERS) {
            let markup = SelectorSet::new().with(*marker);
            assert!(!is_end(&markup, false, &rule), "{} should block the end", marker);
        }
    }

    #[test]
    fn test_single_framework_policy_ignores_other_markers() {
        let markup = SelectorSet::new().with(".slide.future");

        assert!(!FrameworkPolicy::Only(Framework::Html5Slides).is_terminal(&markup));
        assert!(FrameworkPolicy::Only(Framework::Reveal).is_terminal(&markup));
        assert!(!FrameworkPolicy::Combined.is_terminal(&markup));
    }

    #[test]
    fn test_already_ended_skips_evaluation() {
        let markup = Recording { present: SelectorSet::new().with(".future"), asked: RefCell::new(Vec::new()) };

        assert!(is_end(&markup, true, &StoppingRule::default()));
        assert!(markup.asked.borrow().is_empty());
    }

    #[test]
    fn test_custom_rule_overrides_framework_default() {
        let rule = StoppingRule::Custom(CustomRule::new(Operator::Or, false, queries(&["#thanks"])).unwrap());

        // No forward markers, but the custom rule has not fired yet
        assert!(!is_end(&SelectorSet::new(), false, &rule));
        assert!(is_end(&SelectorSet::new().with("#thanks"), false, &rule));
    }

    #[test]
    fn test_auto_mode_detection() {
        let reveal = SelectorSet::new().with(".reveal");
        let html5 = SelectorSet::new().with(".slide");
        let both = SelectorSet::new().with(".reveal").with(".slide");

        assert_eq!(FrameworkMode::Auto.resolve(&reveal), FrameworkPolicy::Only(Framework::Reveal));
        assert_eq!(FrameworkMode::Auto.resolve(&html5), FrameworkPolicy::Only(Framework::Html5Slides));
        assert_eq!(FrameworkMode::Auto.resolve(&both), FrameworkPolicy::Combined);
        assert_eq!(FrameworkMode::Auto.resolve(&SelectorSet::new()), FrameworkPolicy::Combined);
        assert_eq!(FrameworkMode::Reveal.resolve(&html5), FrameworkPolicy::Only(Framework::Reveal));
    }

    #[test]
    fn test_framework_mode_from_str() {
        assert_eq!("AUTO".parse::<FrameworkMode>(), Ok(FrameworkMode::Auto));
        assert_eq!("html5slides".parse::<FrameworkMode>(), Ok(FrameworkMode::Html5slides));
        assert!("impress".parse::<FrameworkMode>().is_err());
    }

    #[test]
    fn test_framework_mode_deserialize() {
        let mode: FrameworkMode = serde_json::from_str("\"reveal\"").unwrap();
        assert_eq!(mode, FrameworkMode::Reveal);
    }

    #[test]
    fn test_framework_default_against_real_markup() {
        let last_reveal = MarkupSnapshot::parse(
            r#"<div class="reveal"><div class="slides">
                 <section class="past"></section><section class="present"></section>
               </div>
               <aside class="controls"><button class="navigate-right"></button>
               <button class="navigate-down"></button></aside></div>"#,
        );
        let middle_html5 = MarkupSnapshot::parse(
            r#"<div class="slides"><div class="slide past"></div><div class="slide current"></div>
               <div class="slide future"></div><div class="slide far-future"></div></div>"#,
        );

        assert!(is_end(&last_reveal, false, &StoppingRule::default()));
        assert!(!is_end(&middle_html5, false, &StoppingRule::default()));
    }
}
