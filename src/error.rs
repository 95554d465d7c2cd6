use thiserror::Error;

/// Errors produced while capturing a slide deck
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Failed to read slide markup: {0}")]
    MarkupFailed(String),

    #[error("Failed to send key '{key}': {reason}")]
    KeyPressFailed { key: String, reason: String },

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Document assembly failed: {0}")]
    AssemblyFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The first markup fetch of a run failed, nothing was captured
    #[error("Could not reach slide content: {0}")]
    ContentUnreachable(#[source] Box<DeckError>),

    /// A fetch, capture or navigation step failed after the run started
    #[error("Navigation or capture failed mid-run at slide {slide}: {source}")]
    TraversalFailed {
        slide: usize,
        #[source]
        source: Box<DeckError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    /// Whether the run failed before any slide content could be read
    pub fn is_content_unreachable(&self) -> bool {
        matches!(self, DeckError::ContentUnreachable(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_failed_message_names_slide() {
        let err = DeckError::TraversalFailed {
            slide: 4,
            source: Box::new(DeckError::ScreenshotFailed("tab closed".to_string())),
        };

        let msg = err.to_string();
        assert!(msg.contains("slide 4"));
        assert!(msg.contains("tab closed"));
        assert!(!err.is_content_unreachable());
    }

    #[test]
    fn test_content_unreachable() {
        let err = DeckError::ContentUnreachable(Box::new(DeckError::MarkupFailed("gone".to_string())));
        assert!(err.is_content_unreachable());
        assert!(err.to_string().starts_with("Could not reach slide content"));
    }
}
