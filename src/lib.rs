//! # pdfdiff
//!
//! Visual page-by-page comparison of two PDF documents.
//!
//! Both documents are rendered page by page, the renders are diffed pixel
//! by pixel, and every page that changed gets a PNG crop tightly framing the
//! change written to an output directory.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdiff::{compare_files, CompareOptions};
//!
//! fn main() -> pdfdiff::Result<()> {
//!     let options = CompareOptions::new().with_output_dir("images");
//!     let report = compare_files("before.pdf", "after.pdf", &options)?;
//!     for path in report.paths() {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Locate**: horizontal text extent of both pages, merged
//! - **Rasterize**: render through Pdfium, optionally clipped
//! - **Detect**: absolute difference, luma threshold, outer contours
//! - **Refine**: blank-scan or text-anchored crop bounds
//! - **Write**: collision-free `page_{n}_diff.png` names

pub mod backend;
pub mod compare;
pub mod diff;
pub mod error;
pub mod locate;
pub mod model;
pub mod options;
pub mod output;
pub mod raster;
pub mod refine;
pub mod report;

// Re-export commonly used types
pub use backend::{PageSource, PdfBackend, PdfiumDocument, PdfiumRenderer};
pub use compare::{compare_documents, compare_documents_with, PageEvent};
pub use diff::DiffDetector;
pub use error::{Error, Result};
pub use model::{BlockKind, DiffRegion, PageRect, TextBlock, TextRange};
pub use options::{CompareOptions, CropSource, RefineStrategy, TopFallback};
pub use refine::{BlankScanRefiner, CropBounds, RefineContext, Refiner, TextAnchoredRefiner};
pub use report::{CropResult, DiffReport, JsonFormat};

use std::path::{Path, PathBuf};

/// Compare two PDF files with Pdfium and write crops of every changed page.
///
/// # Arguments
///
/// * `pdf1` - Path to the original PDF
/// * `pdf2` - Path to the modified PDF
///
/// Crops are cut from the document selected by [`CompareOptions::crop_source`].
/// * `options` - Comparison options
///
/// # Example
///
/// ```no_run
/// use pdfdiff::{compare_files, CompareOptions};
///
/// let report = compare_files("v1.pdf", "v2.pdf", &CompareOptions::default()).unwrap();
/// println!("{} pages changed", report.crops.len());
/// ```
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
    pdf1: P,
    pdf2: Q,
    options: &CompareOptions,
) -> Result<DiffReport> {
    compare_files_with(pdf1, pdf2, options, |_| {})
}

/// Like [`compare_files`], reporting each page pair as it is processed.
pub fn compare_files_with<P, Q, F>(
    pdf1: P,
    pdf2: Q,
    options: &CompareOptions,
    on_page: F,
) -> Result<DiffReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(PageEvent<'_>),
{
    options.validate()?;
    let renderer = PdfiumRenderer::bind()?;
    let before = renderer.open(pdf1)?;
    let after = renderer.open(pdf2)?;
    compare_documents_with(&before, &after, options, on_page)
}

/// Builder for comparing PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfdiff::{PdfDiff, RefineStrategy};
///
/// let report = PdfDiff::new()
///     .with_dpi(150.0)
///     .with_output_dir("./diffs")
///     .with_strategy(RefineStrategy::BlankScan)
///     .compare("v1.pdf", "v2.pdf")?;
/// # Ok::<(), pdfdiff::Error>(())
/// ```
pub struct PdfDiff {
    options: CompareOptions,
}

impl PdfDiff {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: CompareOptions::default(),
        }
    }

    /// Set rendering resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.options = self.options.with_dpi(dpi);
        self
    }

    /// Set output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_output_dir(dir);
        self
    }

    /// Set difference threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.options = self.options.with_threshold(threshold);
        self
    }

    /// Set refinement strategy.
    pub fn with_strategy(mut self, strategy: RefineStrategy) -> Self {
        self.options = self.options.with_strategy(strategy);
        self
    }

    /// Set the blank background level.
    pub fn with_white_level(mut self, level: u8) -> Self {
        self.options = self.options.with_white_level(level);
        self
    }

    /// Set the top anchor fallback.
    pub fn with_top_fallback(mut self, fallback: TopFallback) -> Self {
        self.options = self.options.with_top_fallback(fallback);
        self
    }

    /// Set the document crops are cut from.
    pub fn with_crop_source(mut self, source: CropSource) -> Self {
        self.options = self.options.with_crop_source(source);
        self
    }

    /// Options collected so far.
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare two PDF files.
    pub fn compare<P: AsRef<Path>, Q: AsRef<Path>>(&self, pdf1: P, pdf2: Q) -> Result<DiffReport> {
        compare_files(pdf1, pdf2, &self.options)
    }

    /// Compare two already opened documents.
    pub fn compare_documents(
        &self,
        before: &dyn PdfBackend,
        after: &dyn PdfBackend,
    ) -> Result<DiffReport> {
        compare_documents(before, after, &self.options)
    }
}

impl Default for PdfDiff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SyntheticDocument, SyntheticPage};

    #[test]
    fn test_pdfdiff_builder_default() {
        let builder = PdfDiff::default();
        assert_eq!(builder.options().dpi, 200.0);
        assert_eq!(builder.options().strategy, RefineStrategy::TextAnchored);
    }

    #[test]
    fn test_pdfdiff_builder_chained() {
        let builder = PdfDiff::new()
            .with_dpi(96.0)
            .with_output_dir("out")
            .with_threshold(5)
            .with_strategy(RefineStrategy::BlankScan)
            .with_white_level(240)
            .with_top_fallback(TopFallback::PageBottom)
            .with_crop_source(CropSource::Second);

        let options = builder.options();
        assert_eq!(options.dpi, 96.0);
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.threshold, 5);
        assert_eq!(options.strategy, RefineStrategy::BlankScan);
        assert_eq!(options.white_level, 240);
        assert_eq!(options.top_fallback, TopFallback::PageBottom);
        assert_eq!(options.crop_source, CropSource::Second);
    }

    #[test]
    fn test_compare_files_rejects_invalid_options_first() {
        // Validation runs before Pdfium is bound or any file is opened.
        let options = CompareOptions::new().with_dpi(-1.0);
        let result = compare_files("missing-a.pdf", "missing-b.pdf", &options);
        assert!(matches!(result, Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_builder_compare_documents() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = SyntheticDocument::new(vec![SyntheticPage::letter()]);
        let report = PdfDiff::new()
            .with_dpi(36.0)
            .with_output_dir(dir.path())
            .compare_documents(&doc, &doc)
            .unwrap();
        assert_eq!(report.pages_compared, 1);
        assert!(!report.has_differences());
    }
}
