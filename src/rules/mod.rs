//! Slide traversal rules
//!
//! Pure decision functions over a markup snapshot:
//! - [`is_end`]: has the deck reached its last slide
//! - [`next_action`]: which key advances to the next slide
//!
//! [`RuleSet::resolve`] validates the configured rules once per run.
//! Shape problems never fail a run; they are reported as [`Diagnostic`]s and
//! the affected rule falls back to its built-in default.

pub mod navigation;
pub mod stopping;

pub use navigation::{Action, DOWN_ENABLED_SELECTOR, NavEntry, NavigationTable, default_action, next_action};
pub use stopping::{CustomRule, Framework, FrameworkMode, FrameworkPolicy, Operator, StopRuleConfig, StoppingRule,
                   fold_queries, is_end};

use crate::markup::{SelectorMatcher, is_valid_selector};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Configuration-shape problem recovered by falling back to a default
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("stop rule has no queries, using the framework end detection")]
    EmptyStopQueries,

    #[error("unknown stop rule operator '{0}', treating it as OR")]
    UnknownOperator(String),

    #[error("navigation table is empty, using the default navigation rule")]
    EmptyNavigationTable,

    #[error(
        "navigation entry {position} has {len} element(s) instead of a selector and an action, using the default navigation rule"
    )]
    MalformedNavigationEntry { position: usize, len: usize },

    #[error("navigation entry {position} has a blank selector or action, using the default navigation rule")]
    BlankNavigationEntry { position: usize },

    #[error("stop rule is not an object of operator, reverse and queries ({0}), using the framework end detection")]
    MalformedStopRule(String),

    #[error("navigation table is not a list of [selector, action] pairs ({0}), using the default navigation rule")]
    MalformedNavigationTable(String),

    #[error("selector '{0}' is not valid CSS and will never match")]
    InvalidSelector(String),
}

/// Rules in force for one run
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// User stopping rule; None means framework end detection
    pub custom: Option<CustomRule>,

    /// Built-in policy selection when no custom rule is in force
    pub framework: FrameworkMode,

    /// Validated navigation table; None means the default navigation rule
    pub navigation: Option<NavigationTable>,

    /// Problems found while validating, in the order they were found
    pub diagnostics: Vec<Diagnostic>,
}

impl RuleSet {
    /// Validate raw configuration into the rules for a run
    ///
    /// Each diagnostic is logged once here.
    pub fn resolve(
        stop_rule: Option<&StopRuleConfig>,
        navigation: Option<&[Vec<String>]>,
        framework: FrameworkMode,
    ) -> Self {
        Self::build(stop_rule, navigation, framework, Vec::new())
    }

    /// Like [`RuleSet::resolve`], starting from untyped configuration values
    ///
    /// A value of the wrong shape is reported and treated as absent.
    pub fn from_json(stop_rule: Option<&Value>, navigation: Option<&Value>, framework: FrameworkMode) -> Self {
        let mut diagnostics = Vec::new();

        let stop_rule: Option<StopRuleConfig> =
            stop_rule.and_then(|value| decode(value, &mut diagnostics, Diagnostic::MalformedStopRule));
        let navigation: Option<Vec<Vec<String>>> =
            navigation.and_then(|value| decode(value, &mut diagnostics, Diagnostic::MalformedNavigationTable));

        Self::build(stop_rule.as_ref(), navigation.as_deref(), framework, diagnostics)
    }

    fn build(
        stop_rule: Option<&StopRuleConfig>,
        navigation: Option<&[Vec<String>]>,
        framework: FrameworkMode,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let custom = stop_rule.and_then(|config| {
            let operator = match config.operator.as_deref() {
                None => Operator::Or,
                Some(name) => Operator::parse(name).unwrap_or_else(|| {
                    diagnostics.push(Diagnostic::UnknownOperator(name.to_string()));
                    Operator::Or
                }),
            };

            let rule = CustomRule::new(operator, config.reverse, config.queries.clone());
            if rule.is_none() {
                diagnostics.push(Diagnostic::EmptyStopQueries);
            }
            rule
        });

        let navigation = navigation.and_then(|raw| match NavigationTable::from_raw(raw) {
            Ok(table) => Some(table),
            Err(diagnostic) => {
                diagnostics.push(diagnostic);
                None
            }
        });

        let selectors = custom
            .iter()
            .flat_map(|rule| rule.queries().iter())
            .chain(navigation.iter().flat_map(|table| table.entries().iter().map(|entry| &entry.selector)));
        for selector in selectors {
            if !is_valid_selector(selector) {
                diagnostics.push(Diagnostic::InvalidSelector(selector.clone()));
            }
        }

        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }

        Self { custom, framework, navigation, diagnostics }
    }

    /// Stopping rule for the run, resolving framework detection against the first snapshot
    pub fn stopping_rule(&self, initial: &impl SelectorMatcher) -> StoppingRule {
        match &self.custom {
            Some(rule) => StoppingRule::Custom(rule.clone()),
            None => StoppingRule::Framework(self.framework.resolve(initial)),
        }
    }
}

fn decode<T: DeserializeOwned>(
    value: &Value,
    diagnostics: &mut Vec<Diagnostic>,
    diagnostic: fn(String) -> Diagnostic,
) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            diagnostics.push(diagnostic(e.to_string()));
            None
        }
    }
}
