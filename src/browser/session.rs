use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            error::{DeckError, Result}};
use headless_chrome::{Browser, Tab,
                      protocol::cdp::Page::{self, CaptureScreenshotFormatOption},
                      types::PrintToPdfOptions};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that owns a Chrome/Chromium instance and the tab the deck is rendered in
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tab the deck is loaded into
    tab: Arc<Tab>,

    /// Attached to a browser we did not launch; only our tab is ours to close
    attached: bool,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Scrollbars would end up in every screenshot
        launch_opts.args.push(OsStr::new("--hide-scrollbars"));

        // Long decks with slow animations outlive the default 30 second idle timeout
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| DeckError::LaunchFailed(e.to_string()))?;

        let tab = browser.new_tab().map_err(|e| DeckError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        log::debug!(
            "Launched browser at {} ({}x{})",
            browser.get_ws_url(),
            options.window_width,
            options.window_height
        );

        Ok(Self { browser, tab, attached: false })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| DeckError::ConnectionFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| DeckError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;

        log::debug!("Attached to browser at {}", browser.get_ws_url());

        Ok(Self { browser, tab, attached: true })
    }

    /// Navigate the deck tab to a URL
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| DeckError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| DeckError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Current rendered markup of the document
    pub fn content(&self) -> Result<String> {
        self.tab.get_content().map_err(|e| DeckError::MarkupFailed(e.to_string()))
    }

    /// Dispatch a key press (e.g. "ArrowRight") to the page
    pub fn press_key(&self, key: &str) -> Result<()> {
        self.tab
            .press_key(key)
            .map_err(|e| DeckError::KeyPressFailed { key: key.to_string(), reason: e.to_string() })?;

        Ok(())
    }

    /// Capture the viewport as PNG bytes
    pub fn capture_png(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| DeckError::ScreenshotFailed(e.to_string()))
    }

    /// Print the current page to PDF
    pub fn print_pdf(&self, options: PrintToPdfOptions) -> Result<Vec<u8>> {
        self.tab
            .print_to_pdf(Some(options))
            .map_err(|e| DeckError::AssemblyFailed(format!("Failed to print PDF: {}", e)))
    }

    /// Replace the current document with `html` and wait for its images to decode
    ///
    /// The markup is handed to the browser directly, so nothing it references
    /// has to exist on the browser's filesystem.
    pub fn set_content(&self, html: &str) -> Result<()> {
        self.navigate("about:blank")?;
        self.wait_for_navigation()?;

        let tree = self
            .tab
            .call_method(Page::GetFrameTree(None))
            .map_err(|e| DeckError::TabOperationFailed(format!("Failed to read frame tree: {}", e)))?;

        self.tab
            .call_method(Page::SetDocumentContent { frame_id: tree.frame_tree.frame.id, html: html.to_string() })
            .map_err(|e| DeckError::TabOperationFailed(format!("Failed to set document content: {}", e)))?;

        self.tab
            .evaluate("Promise.all(Array.from(document.images, img => img.decode()))", true)
            .map_err(|e| DeckError::TabOperationFailed(format!("Images failed to load: {}", e)))?;

        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // A launched browser is shut down by headless_chrome; an attached one keeps running
        if self.attached
            && let Err(e) = self.tab.close(false)
        {
            log::warn!("Failed to close deck tab: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_options_builder() {
        let opts = LaunchOptions::new().headless(false).window_size(1920, 1080).sandbox(false);

        assert!(!opts.headless);
        assert!(!opts.sandbox);
        assert_eq!(opts.window_width, 1920);
        assert_eq!(opts.window_height, 1080);
    }

    #[test]
    fn test_launch_options_default_viewport() {
        let opts = LaunchOptions::default();

        assert!(opts.headless);
        assert_eq!((opts.window_width, opts.window_height), (1280, 720));
        assert!(opts.chrome_path.is_none());
    }

    #[test]
    fn test_connection_options() {
        let opts = ConnectionOptions::new("ws://localhost:9222").timeout(5000);

        assert_eq!(opts.ws_url, "ws://localhost:9222");
        assert_eq!(opts.timeout, 5000);
    }

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    fn test_launch_browser() {
        let result = BrowserSession::launch(LaunchOptions::new().headless(true));
        assert!(result.is_ok());
    }

    #[test]
    #[ignore]
    fn test_attached_session_closes_its_tab_on_drop() {
        let host = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

        let attached = BrowserSession::connect(ConnectionOptions::new(host.browser.get_ws_url()))
            .expect("Failed to attach to browser");
        let target = attached.tab.get_target_id().clone();
        assert!(attached.attached);
        assert!(!host.attached);

        drop(attached);
        std::thread::sleep(Duration::from_millis(500));

        let tabs = host.browser.get_tabs().lock().expect("tab list poisoned");
        assert!(tabs.iter().all(|tab| tab.get_target_id() != &target));
    }

    #[test]
    #[ignore]
    fn test_set_content_rejects_unreachable_images() {
        let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

        session.set_content("<p id='inline'>ok</p>").expect("Failed to set content");
        assert!(session.content().expect("Failed to read content").contains("inline"));

        let broken = session.set_content("<img src='slide-0001.png'>");
        assert!(matches!(broken, Err(DeckError::TabOperationFailed(_))));
    }

    #[test]
    #[ignore]
    fn test_content_after_navigate() {
        let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

        session.navigate("data:text/html,<html><body><p id='hello'>Hi</p></body></html>").expect("Failed to navigate");
        session.wait_for_navigation().expect("Navigation did not complete");

        let html = session.content().expect("Failed to read content");
        assert!(html.contains("hello"));
    }
}
