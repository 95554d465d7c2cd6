use crate::{browser::BrowserSession,
            error::{DeckError, Result},
            traversal::CaptureSink};
use std::path::{Path, PathBuf};

/// Anything that can produce a PNG of what is currently on screen
pub trait PngSource {
    fn capture_png(&self) -> Result<Vec<u8>>;
}

impl PngSource for BrowserSession {
    fn capture_png(&self) -> Result<Vec<u8>> {
        BrowserSession::capture_png(self)
    }
}

/// File name used for a slide's screenshot
pub fn slide_file_name(slide_index: usize) -> String {
    format!("slide-{:04}.png", slide_index)
}

/// Capture sink that writes one PNG per capture signal into a directory
pub struct ScreenshotSink<'a, S: PngSource + ?Sized> {
    source: &'a S,
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl<'a, S: PngSource + ?Sized> ScreenshotSink<'a, S> {
    pub fn new(source: &'a S, dir: impl Into<PathBuf>) -> Self {
        Self { source, dir: dir.into(), files: Vec::new() }
    }

    /// Screenshots written so far, in capture order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl<S: PngSource + ?Sized> CaptureSink for ScreenshotSink<'_, S> {
    fn capture(&mut self, slide_index: usize) -> Result<()> {
        let png = self.source.capture_png()?;
        let path = self.dir.join(slide_file_name(slide_index));

        std::fs::write(&path, png)
            .map_err(|e| DeckError::ScreenshotFailed(format!("Failed to write {}: {}", path.display(), e)))?;

        log::debug!("Wrote {}", path.display());
        self.files.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ScratchArea;
    use std::cell::Cell;

    struct CountingSource {
        shots: Cell<u8>,
    }

    impl PngSource for CountingSource {
        fn capture_png(&self) -> Result<Vec<u8>> {
            self.shots.set(self.shots.get() + 1);
            Ok(vec![self.shots.get()])
        }
    }

    struct BrokenSource;

    impl PngSource for BrokenSource {
        fn capture_png(&self) -> Result<Vec<u8>> {
            Err(DeckError::ScreenshotFailed("target closed".to_string()))
        }
    }

    #[test]
    fn test_slide_file_name() {
        assert_eq!(slide_file_name(1), "slide-0001.png");
        assert_eq!(slide_file_name(42), "slide-0042.png");
        assert_eq!(slide_file_name(12345), "slide-12345.png");
    }

    #[test]
    fn test_sink_writes_one_file_per_signal() {
        let scratch = ScratchArea::new().unwrap();
        let source = CountingSource { shots: Cell::new(0) };
        let mut sink = ScreenshotSink::new(&source, scratch.path());

        sink.capture(1).unwrap();
        sink.capture(2).unwrap();

        let files = sink.into_files();
        assert_eq!(files, vec![scratch.path().join("slide-0001.png"), scratch.path().join("slide-0002.png")]);
        assert_eq!(std::fs::read(&files[1]).unwrap(), vec![2]);
    }

    #[test]
    fn test_sink_propagates_source_error() {
        let scratch = ScratchArea::new().unwrap();
        let mut sink = ScreenshotSink::new(&BrokenSource, scratch.path());

        assert!(matches!(sink.capture(1), Err(DeckError::ScreenshotFailed(_))));
        assert!(sink.files().is_empty());
    }
}
