//! Page rendering: split a PDF page into prompt and answer images.
//!
//! Rendering goes through the [`PageRenderer`] trait so the HTTP layer and
//! cache never depend on pdfium directly. [`PdfiumRenderer`] is the real
//! implementation; it is blocking and must be called from
//! `tokio::task::spawn_blocking`.

use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;
use thiserror::Error;
use tracing::debug;

/// PDF user space is 72 points per inch.
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("not a readable PDF: {0}")]
    InvalidDocument(String),
    #[error("page index {index} out of range (document has {total} pages)")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("pdfium library unavailable: {0}")]
    Library(String),
    #[error("rasterisation failed for page {page}: {detail}")]
    Rasterisation { page: usize, detail: String },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("render task failed: {0}")]
    Task(String),
}

/// PNG-encoded left and right halves of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHalves {
    pub left: Vec<u8>,
    pub right: Vec<u8>,
}

/// Converts document bytes into page counts and split page images.
///
/// Implementations must be pure functions of their arguments so results can
/// be cached by document identity.
pub trait PageRenderer: Send + Sync {
    /// Number of pages, or `InvalidDocument` if the bytes cannot be parsed.
    fn page_count(&self, document: &[u8]) -> Result<usize, RenderError>;

    /// Render page `page_index` at `dpi` and split it at the horizontal midpoint.
    fn render_halves(
        &self,
        document: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<PageHalves, RenderError>;
}

/// Split a rendered page into left and right images.
///
/// The left half gets `width / 2` columns; the right half gets the rest.
pub fn split_halves(page: &DynamicImage) -> (DynamicImage, DynamicImage) {
    let (width, height) = (page.width(), page.height());
    let mid = width / 2;
    let left = page.crop_imm(0, 0, mid, height);
    let right = page.crop_imm(mid, 0, width - mid, height);
    (left, right)
}

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encode both halves of a rendered page.
pub fn encode_halves(page: &DynamicImage) -> Result<PageHalves, RenderError> {
    let (left, right) = split_halves(page);
    Ok(PageHalves {
        left: encode_png(&left)?,
        right: encode_png(&right)?,
    })
}

/// pdfium-backed renderer.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    library_path: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// Renderer binding to the library at `library_path`, or to the
    /// system library when `None`.
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self { library_path }
    }

    fn bind(&self) -> Result<Pdfium, RenderError> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| RenderError::Library(format!("{:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn page_count(&self, document: &[u8]) -> Result<usize, RenderError> {
        let pdfium = self.bind()?;
        let doc = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| RenderError::InvalidDocument(format!("{:?}", e)))?;
        Ok(doc.pages().len() as usize)
    }

    fn render_halves(
        &self,
        document: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<PageHalves, RenderError> {
        let pdfium = self.bind()?;
        let doc = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| RenderError::InvalidDocument(format!("{:?}", e)))?;

        let pages = doc.pages();
        let total = pages.len() as usize;
        if page_index >= total {
            return Err(RenderError::IndexOutOfRange {
                index: page_index,
                total,
            });
        }

        let rasterisation = |detail: String| RenderError::Rasterisation {
            page: page_index + 1,
            detail,
        };

        let index = u16::try_from(page_index).map_err(|e| rasterisation(e.to_string()))?;
        let page = pages
            .get(index)
            .map_err(|e| rasterisation(format!("{:?}", e)))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| rasterisation(format!("{:?}", e)))?;

        // Flatten to RGB: the answer pane never needs transparency.
        let image = DynamicImage::ImageRgb8(bitmap.as_image().to_rgb8());
        debug!(
            "Rendered page {} at {} dpi → {}x{} px",
            page_index + 1,
            dpi,
            image.width(),
            image.height()
        );

        encode_halves(&image)
    }
}
