//! Capture pipeline
//!
//! Screenshots land in a per-run [`ScratchArea`] as `slide-NNNN.png` and are
//! assembled into the output document once the traversal has finished.

pub mod document;
pub mod scratch;
pub mod sink;

pub use document::{OutputFormat, assemble, assemble_pdf, export_png, png_data_uri, render_page};
pub use scratch::ScratchArea;
pub use sink::{PngSource, ScreenshotSink, slide_file_name};
