//! [`PdfBackend`] backed by Pdfium through `pdfium-render`.

use std::path::{Path, PathBuf};

use image::RgbImage;
use pdfium_render::prelude::*;

use super::{PageSource, PdfBackend};
use crate::error::{Error, Result};
use crate::model::{PageRect, TextBlock};
use crate::raster;

/// Owner of the Pdfium bindings; documents borrow from it.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind to a Pdfium library next to the executable's working directory,
    /// falling back to the system library.
    pub fn bind() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| Error::Library(e.to_string()))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<PdfiumDocument<'_>> {
        let path = path.as_ref();
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::Pdf(format!("{}: {}", path.display(), e)))?;
        log::debug!(
            "opened {} ({} pages)",
            path.display(),
            document.pages().len()
        );
        Ok(PdfiumDocument {
            document,
            path: path.to_path_buf(),
        })
    }
}

/// An opened Pdfium document.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl PdfiumDocument<'_> {
    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<'a> PdfBackend for PdfiumDocument<'a> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn source_path(&self) -> Option<&Path> {
        Some(self.path())
    }

    fn load_page(&self, index: usize) -> Result<Box<dyn PageSource + '_>> {
        let count = self.page_count();
        let page_index = u16::try_from(index)
            .ok()
            .filter(|_| index < count)
            .ok_or(Error::PageOutOfRange(index, count))?;
        let page = self.document.pages().get(page_index)?;
        Ok(Box::new(PdfiumPage { page }))
    }
}

/// A loaded Pdfium page.
pub struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl PageSource for PdfiumPage<'_> {
    fn width(&self) -> f32 {
        self.page.width().value
    }

    fn height(&self) -> f32 {
        self.page.height().value
    }

    fn text_blocks(&self) -> Result<Vec<TextBlock>> {
        let height = self.height();
        let text = self.page.text()?;

        let mut blocks = Vec::new();
        for segment in text.segments().iter() {
            if segment.text().trim().is_empty() {
                continue;
            }
            // Pdfium reports a bottom-left origin; flip to top-left.
            let bounds = segment.bounds();
            blocks.push(TextBlock::text(
                bounds.left().value,
                height - bounds.top().value,
                bounds.right().value,
                height - bounds.bottom().value,
            ));
        }

        Ok(blocks)
    }

    fn render(&self, dpi: f32, clip: Option<&PageRect>) -> Result<RgbImage> {
        let scale = raster::scale_for_dpi(dpi);
        let (width, height) = raster::page_pixel_size(self.width(), self.height(), dpi);
        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32)
            .render_form_data(true)
            .render_annotations(true);

        let full = self.page.render_with_config(&config)?.as_image().to_rgb8();

        Ok(match clip {
            Some(clip) => raster::crop_to_clip(&full, clip, scale),
            None => full,
        })
    }
}
