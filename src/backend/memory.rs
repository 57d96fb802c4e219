//! In-memory documents made of filled rectangles.
//!
//! A [`SyntheticPage`] renders as a white page with its fills painted in
//! order, using the same page-to-pixel geometry as the Pdfium backend. Text
//! blocks are declared explicitly, which makes the text-anchored heuristics
//! testable without a PDF library.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use super::{PageSource, PdfBackend};
use crate::error::{Error, Result};
use crate::model::{PageRect, TextBlock};
use crate::raster;

/// Page background colour.
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// A page described by its size, filled rectangles and text blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPage {
    width: f32,
    height: f32,
    fills: Vec<(PageRect, Rgb<u8>)>,
    blocks: Vec<TextBlock>,
}

impl SyntheticPage {
    /// Create a blank page of the given size in points.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fills: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Blank US Letter page.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Paint a rectangle.
    pub fn with_fill(mut self, rect: PageRect, color: [u8; 3]) -> Self {
        self.fills.push((rect, Rgb(color)));
        self
    }

    /// Declare a block without painting it.
    pub fn with_block(mut self, block: TextBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Paint a black rectangle and declare it as a text block, the way a
    /// line of text both draws ink and reports its bounds.
    pub fn with_text_line(self, rect: PageRect) -> Self {
        self.with_fill(rect, [0, 0, 0])
            .with_block(TextBlock::text(rect.left, rect.top, rect.right, rect.bottom))
    }
}

impl PageSource for SyntheticPage {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn text_blocks(&self) -> Result<Vec<TextBlock>> {
        Ok(self.blocks.clone())
    }

    fn render(&self, dpi: f32, clip: Option<&PageRect>) -> Result<RgbImage> {
        let scale = raster::scale_for_dpi(dpi);
        let (width, height) = raster::page_pixel_size(self.width, self.height, dpi);
        let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

        for (rect, color) in &self.fills {
            let (x, y, w, h) = raster::clip_to_pixels(rect, scale, width, height);
            for py in y..y + h {
                for px in x..x + w {
                    image.put_pixel(px, py, *color);
                }
            }
        }

        Ok(match clip {
            Some(clip) => raster::crop_to_clip(&image, clip, scale),
            None => image,
        })
    }
}

/// A document holding synthetic pages.
///
/// Every requested page index is recorded so callers can verify which pages
/// were loaded.
#[derive(Debug, Default)]
pub struct SyntheticDocument {
    pages: Vec<SyntheticPage>,
    loaded: RefCell<Vec<usize>>,
    source_path: Option<PathBuf>,
}

impl SyntheticDocument {
    /// Create a document from pages.
    pub fn new(pages: Vec<SyntheticPage>) -> Self {
        Self {
            pages,
            loaded: RefCell::new(Vec::new()),
            source_path: None,
        }
    }

    /// Report `path` as the file this document came from.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Append a page.
    pub fn push(&mut self, page: SyntheticPage) {
        self.pages.push(page);
    }

    /// Indices passed to `load_page` so far, in call order.
    pub fn loaded_pages(&self) -> Vec<usize> {
        self.loaded.borrow().clone()
    }
}

impl PdfBackend for SyntheticDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn load_page(&self, index: usize) -> Result<Box<dyn PageSource + '_>> {
        self.loaded.borrow_mut().push(index);
        let page = self
            .pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))?;
        Ok(Box::new(page.clone()))
    }

    fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}
