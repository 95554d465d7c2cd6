//! Browser session management
//!
//! Launches or attaches to Chrome and exposes the handful of page operations
//! the capture run needs: loading the deck, reading its markup, pressing keys,
//! taking screenshots and printing to PDF.

pub mod config;
pub mod deck;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use deck::BrowserDeck;
pub use session::BrowserSession;
