use crate::{browser::BrowserSession,
            error::Result,
            rules::Action,
            traversal::Presentation};

/// A deck rendered in a browser session
///
/// Markup is read from the live document and actions are sent as key presses.
pub struct BrowserDeck<'a> {
    session: &'a BrowserSession,
}

impl<'a> BrowserDeck<'a> {
    /// Load the deck and wait for it to finish navigating
    pub fn open(session: &'a BrowserSession, url: &str) -> Result<Self> {
        session.navigate(url)?;
        session.wait_for_navigation()?;
        log::info!("Opened {}", url);
        Ok(Self { session })
    }
}

impl Presentation for BrowserDeck<'_> {
    fn markup(&mut self) -> Result<String> {
        self.session.content()
    }

    fn navigate(&mut self, action: &Action) -> Result<()> {
        self.session.press_key(action.key())
    }
}
