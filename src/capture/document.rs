use crate::{browser::BrowserSession,
            error::{DeckError, Result}};
use base64::Engine;
use headless_chrome::types::PrintToPdfOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CSS pixels per inch, used to size PDF pages from screenshot pixels
const CSS_PX_PER_INCH: f64 = 96.0;

/// Kind of document produced from the captured slides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One PDF page per slide
    #[default]
    Pdf,
    /// A directory of numbered PNG files
    Png,
}

/// Inline `data:` URI for PNG bytes
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(png))
}

/// HTML page laying out one image per printed page
pub fn render_page(image_sources: &[String], width: u32, height: u32) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><style>\n");
    html.push_str(&format!("@page {{ size: {}px {}px; margin: 0; }}\n", width, height));
    html.push_str("html, body { margin: 0; padding: 0; }\n");
    html.push_str(&format!(
        "img {{ display: block; width: {}px; height: {}px; break-after: page; }}\n",
        width, height
    ));
    html.push_str("img:last-child { break-after: auto; }\n");
    html.push_str("</style></head><body>\n");
    for source in image_sources {
        html.push_str(&format!("<img src=\"{}\">\n", source));
    }
    html.push_str("</body></html>\n");
    html
}

/// Print the captured slides into a single PDF at `output`
///
/// The page is loaded into the same browser session the deck was rendered in,
/// with every slide inlined so the browser never reads the local scratch files.
pub fn assemble_pdf(session: &BrowserSession, images: &[PathBuf], output: &Path) -> Result<()> {
    let first = images.first().ok_or_else(|| DeckError::AssemblyFailed("No slides were captured".to_string()))?;

    let (width, height) = image::image_dimensions(first)
        .map_err(|e| DeckError::AssemblyFailed(format!("Failed to read {}: {}", first.display(), e)))?;

    let sources = images
        .iter()
        .map(|path| std::fs::read(path).map(|png| png_data_uri(&png)))
        .collect::<std::io::Result<Vec<_>>>()?;

    session.set_content(&render_page(&sources, width, height))?;

    let pdf = session.print_pdf(PrintToPdfOptions {
        print_background: Some(true),
        prefer_css_page_size: Some(true),
        paper_width: Some(width as f64 / CSS_PX_PER_INCH),
        paper_height: Some(height as f64 / CSS_PX_PER_INCH),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        ..Default::default()
    })?;

    write_output(output, &pdf)?;
    log::info!("Wrote {} page(s) to {}", images.len(), output.display());
    Ok(())
}

/// Copy the captured slides into the directory `output`
pub fn export_png(images: &[PathBuf], output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)?;

    for image in images {
        let name = image
            .file_name()
            .ok_or_else(|| DeckError::AssemblyFailed(format!("Not a file: {}", image.display())))?;
        std::fs::copy(image, output.join(name))?;
    }

    log::info!("Copied {} slide(s) to {}", images.len(), output.display());
    Ok(())
}

/// Produce the output document in the requested format
pub fn assemble(session: &BrowserSession, format: OutputFormat, images: &[PathBuf], output: &Path) -> Result<()> {
    match format {
        OutputFormat::Pdf => assemble_pdf(session, images, output),
        OutputFormat::Png => export_png(images, output),
    }
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, bytes)?;
    Ok(())
}
