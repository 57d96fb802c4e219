//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the two operations the comparison
//! needs from a PDF library: page geometry with text block positions, and
//! rendering a page (or a clipped part of it) to an RGB bitmap. The concrete
//! Pdfium binding lives in [`pdfium`]; [`memory`] offers synthetic documents
//! built from filled rectangles.

pub mod memory;
pub mod pdfium;

use std::path::Path;

use image::RgbImage;

use crate::error::Result;
use crate::model::{PageRect, TextBlock};

pub use memory::{SyntheticDocument, SyntheticPage};
pub use pdfium::{PdfiumDocument, PdfiumPage, PdfiumRenderer};

/// Abstract interface for an opened, read-only document.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Load the page at a 0-based index.
    ///
    /// Returns [`crate::Error::PageOutOfRange`] when `index >= page_count()`.
    fn load_page(&self, index: usize) -> Result<Box<dyn PageSource + '_>>;

    /// File the document was opened from, if any.
    fn source_path(&self) -> Option<&Path> {
        None
    }
}

/// A single page that can report its layout and render itself.
pub trait PageSource {
    /// Page width in points.
    fn width(&self) -> f32;

    /// Page height in points.
    fn height(&self) -> f32;

    /// Positioned blocks in page order, coordinates with a top-left origin.
    fn text_blocks(&self) -> Result<Vec<TextBlock>>;

    /// Render at `dpi`, limited to `clip` when given.
    fn render(&self, dpi: f32, clip: Option<&PageRect>) -> Result<RgbImage>;

    /// Page bounds as a rectangle.
    fn bounds(&self) -> PageRect {
        PageRect::from_size(self.width(), self.height())
    }
}
