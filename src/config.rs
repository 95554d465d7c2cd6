//! Run configuration
//!
//! A JSON file provides the base configuration; command-line values are
//! layered on top with [`DeckConfig::apply`]. Shape problems inside the stop
//! rule or navigation table are left for [`RuleSet::resolve`] to report.

use crate::{browser::{ConnectionOptions, LaunchOptions},
            capture::OutputFormat,
            error::{DeckError, Result},
            rules::{FrameworkMode, RuleSet},
            traversal::TraversalOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{path::{Path, PathBuf},
          time::Duration};

/// Everything needed for one capture run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Deck location: URL or local path
    pub url: Option<String>,

    /// Output document (PDF file, or directory for PNG output)
    pub output: PathBuf,

    pub format: OutputFormat,

    /// Viewport width in pixels
    pub width: u32,

    /// Viewport height in pixels
    pub height: u32,

    pub headless: bool,

    pub chrome_path: Option<PathBuf>,

    pub sandbox: bool,

    /// Attach to a running browser at this DevTools websocket URL instead of launching one
    pub ws_endpoint: Option<String>,

    /// Pause after each navigation action
    pub animation_delay_ms: u64,

    /// Pause after the deck has loaded, before the first capture
    pub load_pause_ms: u64,

    /// Slide ceiling; unlimited when absent
    pub max_slides: Option<usize>,

    pub framework: FrameworkMode,

    /// `{ "operator", "reverse", "queries" }`, checked by [`RuleSet::from_json`]
    pub stop_rule: Option<Value>,

    /// Rows of `[selector, action]`, checked by [`RuleSet::from_json`]
    pub navigation: Option<Value>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            url: None,
            output: PathBuf::from("slides.pdf"),
            format: OutputFormat::Pdf,
            width: 1280,
            height: 720,
            headless: true,
            chrome_path: None,
            sandbox: true,
            ws_endpoint: None,
            animation_delay_ms: 300,
            load_pause_ms: 1000,
            max_slides: None,
            framework: FrameworkMode::Combined,
            stop_rule: None,
            navigation: None,
        }
    }
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub size: Option<(u32, u32)>,
    pub headless: Option<bool>,
    pub chrome_path: Option<PathBuf>,
    pub sandbox: Option<bool>,
    pub ws_endpoint: Option<String>,
    pub animation_delay_ms: Option<u64>,
    pub load_pause_ms: Option<u64>,
    pub max_slides: Option<usize>,
    pub framework: Option<FrameworkMode>,
}

impl DeckConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DeckError::InvalidConfig(format!("Failed to parse configuration: {}", e)))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeckError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Layer command-line values over this configuration
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.url {
            self.url = Some(url);
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some((width, height)) = overrides.size {
            self.width = width;
            self.height = height;
        }
        if let Some(headless) = overrides.headless {
            self.headless = headless;
        }
        if let Some(path) = overrides.chrome_path {
            self.chrome_path = Some(path);
        }
        if let Some(sandbox) = overrides.sandbox {
            self.sandbox = sandbox;
        }
        if let Some(endpoint) = overrides.ws_endpoint {
            self.ws_endpoint = Some(endpoint);
        }
        if let Some(delay) = overrides.animation_delay_ms {
            self.animation_delay_ms = delay;
        }
        if let Some(pause) = overrides.load_pause_ms {
            self.load_pause_ms = pause;
        }
        if let Some(max) = overrides.max_slides {
            self.max_slides = Some(max);
        }
        if let Some(framework) = overrides.framework {
            self.framework = framework;
        }
        self
    }

    /// Check the values a run cannot start without
    pub fn validate(&self) -> Result<()> {
        match self.url.as_deref().map(str::trim) {
            None | Some("") => return Err(DeckError::InvalidConfig("No deck URL or path given".to_string())),
            Some(_) => {}
        }

        if self.width == 0 || self.height == 0 {
            return Err(DeckError::InvalidConfig(format!("Invalid viewport size {}x{}", self.width, self.height)));
        }

        if self.max_slides == Some(0) {
            return Err(DeckError::InvalidConfig("max_slides must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new()
            .headless(self.headless)
            .window_size(self.width, self.height)
            .sandbox(self.sandbox);
        if let Some(path) = &self.chrome_path {
            options = options.chrome_path(path);
        }
        options
    }

    /// Connection options when attaching to an existing browser
    pub fn connection_options(&self) -> Option<ConnectionOptions> {
        self.ws_endpoint.as_deref().map(ConnectionOptions::new)
    }

    pub fn traversal_options(&self) -> TraversalOptions {
        TraversalOptions {
            animation_delay: Duration::from_millis(self.animation_delay_ms),
            max_slides: self.max_slides,
        }
    }

    /// Validate the stop rule and navigation table for a run
    pub fn rules(&self) -> RuleSet {
        RuleSet::from_json(self.stop_rule.as_ref(), self.navigation.as_ref(), self.framework)
    }
}

/// Parse a `WIDTHxHEIGHT` viewport size
pub fn parse_size(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;

    let width: u32 = width.trim().parse().map_err(|_| format!("invalid width '{}'", width))?;
    let height: u32 = height.trim().parse().map_err(|_| format!("invalid height '{}'", height))?;

    if width == 0 || height == 0 {
        return Err(format!("viewport size must be non-zero, got '{}'", value));
    }
    Ok((width, height))
}
