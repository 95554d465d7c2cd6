//! # deckshot
//!
//! Capture an HTML slide deck slide by slide through Chrome DevTools Protocol (CDP)
//! and assemble the screenshots into a single document.
//!
//! ## Features
//!
//! - **Framework aware**: built-in end-of-deck detection for reveal.js and html5slides-style decks
//! - **Configurable rules**: selector-based stopping rules and priority-ordered navigation tables
//! - **PDF or PNG output**: one page per slide, printed by the same browser that rendered the deck
//!
//! ## Command Line
//!
//! ```bash
//! deckshot https://example.com/talk.html -o talk.pdf
//!
//! # Local deck, larger viewport, slower transitions
//! deckshot ./slides/index.html --size 1920x1080 --delay 800
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use deckshot::{BrowserDeck, BrowserSession, LaunchOptions, RuleSet, ScratchArea, ScreenshotSink,
//!                TraversalController, TraversalOptions};
//! use deckshot::rules::FrameworkMode;
//!
//! # fn main() -> deckshot::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let deck = BrowserDeck::open(&session, "https://example.com/talk.html")?;
//! let scratch = ScratchArea::new()?;
//! let sink = ScreenshotSink::new(&session, scratch.path());
//!
//! let rules = RuleSet::resolve(None, None, FrameworkMode::Auto);
//! let mut controller = TraversalController::new(deck, sink, rules, TraversalOptions::default());
//! let report = controller.run()?;
//! println!("Captured {} slides", report.slide_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Deciding Without a Browser
//!
//! The rules are pure functions of a markup snapshot:
//!
//! ```rust
//! use deckshot::MarkupSnapshot;
//! use deckshot::rules::{Action, StoppingRule, is_end, next_action};
//!
//! let slide = MarkupSnapshot::parse(r#"<button class="navigate-down enabled"></button>"#);
//! assert!(!is_end(&slide, false, &StoppingRule::default()));
//! assert_eq!(next_action(&slide, None), Action::down());
//! ```
//!
//! ## Module Overview
//!
//! - [`rules`]: stopping-condition evaluation and navigation resolution
//! - [`traversal`]: the capture loop state machine
//! - [`markup`]: markup snapshots and selector matching
//! - [`browser`]: browser session management
//! - [`capture`]: screenshots, scratch space and document assembly
//! - [`config`]: configuration file and command-line overrides
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod capture;
pub mod config;
pub mod error;
pub mod markup;
pub mod rules;
pub mod traversal;
pub mod utils;

pub use browser::{BrowserDeck, BrowserSession, ConnectionOptions, LaunchOptions};
pub use capture::{OutputFormat, ScratchArea, ScreenshotSink};
pub use config::{ConfigOverrides, DeckConfig};
pub use error::{DeckError, Result};
pub use markup::{MarkupSnapshot, SelectorMatcher, SelectorSet};
pub use rules::RuleSet;
pub use traversal::{CaptureSink, Presentation, TraversalController, TraversalOptions, TraversalReport};
