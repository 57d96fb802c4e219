//! Error types for pdfdiff library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfdiff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while comparing PDF documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or writing crops.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error encoding or decoding a raster image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The Pdfium shared library could not be bound.
    #[error("Failed to load Pdfium library: {0}")]
    Library(String),

    /// Error opening, loading or rendering a PDF document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Page index is out of range.
    #[error("Page index {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// A comparison option has an unusable value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Error producing a report (JSON serialization).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<pdfium_render::prelude::PdfiumError> for Error {
    fn from(err: pdfium_render::prelude::PdfiumError) -> Self {
        Error::Pdf(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page index 10 is out of range (document has 5 pages)"
        );

        let err = Error::InvalidOption("dpi must be positive".into());
        assert_eq!(err.to_string(), "Invalid option: dpi must be positive");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
