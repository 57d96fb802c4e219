//! Page-by-page comparison pipeline.
//!
//! For every page index present in both documents: locate the merged text
//! range, render both pages, detect the changed region, refine it into a
//! crop and write the crop out. Pages without differences are skipped.
//!
//! [`CompareOptions::crop_source`] picks which document's page is cropped
//! (and resized when sizes differ); the other page is the reference.

use crate::backend::{PageSource, PdfBackend};
use crate::diff::DiffDetector;
use crate::error::Result;
use crate::locate;
use crate::options::{CompareOptions, CropSource};
use crate::output::OutputWriter;
use crate::raster;
use crate::refine::{RefineContext, Refiner};
use crate::report::{CropResult, DiffReport};

/// Per-page progress reported while a comparison runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent<'a> {
    /// The page pair rendered identically (within the threshold)
    Unchanged {
        /// Page number (1-indexed)
        page_number: u32,
    },
    /// A crop was written for the page pair
    Changed(&'a CropResult),
}

/// Compare two opened documents and write a crop per differing page.
pub fn compare_documents(
    before: &dyn PdfBackend,
    after: &dyn PdfBackend,
    options: &CompareOptions,
) -> Result<DiffReport> {
    compare_documents_with(before, after, options, |_| {})
}

/// Like [`compare_documents`], calling `on_page` after each page pair in
/// processing order.
pub fn compare_documents_with<F>(
    before: &dyn PdfBackend,
    after: &dyn PdfBackend,
    options: &CompareOptions,
    mut on_page: F,
) -> Result<DiffReport>
where
    F: FnMut(PageEvent<'_>),
{
    options.validate()?;

    let comparer = PageComparer {
        options,
        detector: DiffDetector::new(options.threshold),
        refiner: options.refiner(),
        writer: OutputWriter::create(&options.output_dir)?,
    };

    let (count1, count2) = (before.page_count(), after.page_count());
    if count1 != count2 {
        log::info!(
            "page counts differ ({} vs {}), comparing the first {}",
            count1,
            count2,
            count1.min(count2)
        );
    }

    let mut report = DiffReport {
        before: before.source_path().map(Into::into),
        after: after.source_path().map(Into::into),
        pages_unmatched: count1.abs_diff(count2),
        ..DiffReport::default()
    };

    for index in 0..count1.min(count2) {
        let page_number = index as u32 + 1;
        report.pages_compared += 1;

        match comparer.compare_page(before, after, index)? {
            Some(crop) => {
                on_page(PageEvent::Changed(&crop));
                report.crops.push(crop);
            }
            None => on_page(PageEvent::Unchanged { page_number }),
        }
    }

    Ok(report)
}

struct PageComparer<'o> {
    options: &'o CompareOptions,
    detector: DiffDetector,
    refiner: Box<dyn Refiner>,
    writer: OutputWriter,
}

impl PageComparer<'_> {
    fn compare_page(
        &self,
        before: &dyn PdfBackend,
        after: &dyn PdfBackend,
        index: usize,
    ) -> Result<Option<CropResult>> {
        let page_number = index as u32 + 1;
        let page1 = before.load_page(index)?;
        let page2 = after.load_page(index)?;
        let (reference, target): (&dyn PageSource, &dyn PageSource) =
            match self.options.crop_source {
                CropSource::First => (&*page2, &*page1),
                CropSource::Second => (&*page1, &*page2),
            };

        let text_range = locate::merged_text_range(&*page1, &*page2)?;
        let clip = self
            .refiner
            .clip_to_text()
            .then(|| text_range.to_clip(reference.height()));

        let dpi = self.options.dpi;
        let reference_img = reference.render(dpi, clip.as_ref())?;
        let target_img =
            raster::match_dimensions(&reference_img, target.render(dpi, clip.as_ref())?);

        let Some(region) = self.detector.detect(&reference_img, &target_img) else {
            log::debug!("page {}: no difference", page_number);
            return Ok(None);
        };
        log::debug!(
            "page {}: text range {:?}, changed region {:?}",
            page_number,
            text_range,
            region
        );

        let ctx = RefineContext {
            region,
            page: target,
            text_range,
            reference: &reference_img,
            target: &target_img,
            dpi,
        };
        let bounds = self.refiner.refine(&ctx)?;
        let crop = self.refiner.extract(&bounds, &ctx)?;
        let path = self.writer.write(&crop, page_number)?;

        Ok(Some(CropResult {
            page_number,
            region,
            width: crop.width(),
            height: crop.height(),
            path,
        }))
    }
}
