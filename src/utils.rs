use std::path::Path;
use url::Url;

/// Turn a deck location given by the user into a URL Chrome can open
///
/// Anything with a scheme is kept as-is, existing local files become
/// absolute `file://` URLs, and bare host names get `https://`.
pub fn normalize_location(location: &str) -> String {
    let trimmed = location.trim();

    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("file://")
        || trimmed.starts_with("data:")
        || trimmed.starts_with("about:")
    {
        return trimmed.to_string();
    }

    let path = Path::new(trimmed);
    if let Some(url) = path.canonicalize().ok().and_then(|absolute| file_url(&absolute)) {
        return url;
    }

    // localhost special case - use http by default
    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed)
}

/// `file://` URL for an absolute path; None for relative paths
pub fn file_url(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_schemes() {
        assert_eq!(normalize_location("https://example.com/deck"), "https://example.com/deck");
        assert_eq!(normalize_location("http://example.com"), "http://example.com");
        assert_eq!(normalize_location("file:///tmp/deck.html"), "file:///tmp/deck.html");
        assert_eq!(normalize_location("data:text/html,<p>x</p>"), "data:text/html,<p>x</p>");
    }

    #[test]
    fn test_normalize_localhost() {
        assert_eq!(normalize_location("localhost:8000/slides"), "http://localhost:8000/slides");
        assert_eq!(normalize_location("127.0.0.1:8080"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_normalize_bare_host() {
        assert_eq!(normalize_location("  slides.example.com/talk  "), "https://slides.example.com/talk");
    }

    #[test]
    fn test_normalize_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let deck = dir.path().join("deck.html");
        std::fs::write(&deck, "<html></html>").unwrap();

        let url = normalize_location(deck.to_str().unwrap());
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/deck.html"));
    }

    #[test]
    #[cfg(unix)]
    fn test_file_url_escapes() {
        assert_eq!(file_url(Path::new("/tmp/my deck/#1.html")).as_deref(), Some("file:///tmp/my%20deck/%231.html"));
        assert_eq!(file_url(Path::new("/tmp/100%.html")).as_deref(), Some("file:///tmp/100%25.html"));
    }

    #[test]
    #[cfg(unix)]
    fn test_file_url_keeps_non_utf8_bytes() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let path = Path::new(OsStr::from_bytes(b"/tmp/deck-\xff.html"));
        assert_eq!(file_url(path).as_deref(), Some("file:///tmp/deck-%FF.html"));
    }

    #[test]
    fn test_file_url_needs_absolute_path() {
        assert_eq!(file_url(Path::new("deck.html")), None);
    }
}
