//! Comparison options and configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::refine::{BlankScanRefiner, Refiner, TextAnchoredRefiner};

/// Default rendering resolution.
pub const DEFAULT_DPI: f32 = 200.0;

/// Default luma cutoff above which a pixel counts as changed.
pub const DEFAULT_THRESHOLD: u8 = 30;

/// Default output directory for crops.
pub const DEFAULT_OUTPUT_DIR: &str = "images";

/// Highest accepted rendering resolution.
pub const MAX_DPI: f32 = 1200.0;

/// Options for comparing two PDF documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Rendering resolution in dots per inch
    pub dpi: f32,

    /// Directory crops are written into (created if missing)
    pub output_dir: PathBuf,

    /// Luma difference cutoff (0-255) for the change mask
    pub threshold: u8,

    /// How a detected region is turned into a crop
    pub strategy: RefineStrategy,

    /// Channel level at or above which a pixel counts as blank background
    pub white_level: u8,

    /// Top anchor used by the text-anchored strategy when no text block
    /// precedes the change
    pub top_fallback: TopFallback,

    /// Document whose render is cropped and resized to match the other
    pub crop_source: CropSource,
}

impl CompareOptions {
    /// Create new compare options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set difference threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set refinement strategy.
    pub fn with_strategy(mut self, strategy: RefineStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the blank background level.
    pub fn with_white_level(mut self, level: u8) -> Self {
        self.white_level = level;
        self
    }

    /// Set the top anchor fallback.
    pub fn with_top_fallback(mut self, fallback: TopFallback) -> Self {
        self.top_fallback = fallback;
        self
    }

    /// Set the document crops are cut from.
    pub fn with_crop_source(mut self, source: CropSource) -> Self {
        self.crop_source = source;
        self
    }

    /// Check that the options can drive a comparison.
    pub fn validate(&self) -> Result<()> {
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(Error::InvalidOption(format!(
                "dpi must be a positive number, got {}",
                self.dpi
            )));
        }
        if self.dpi > MAX_DPI {
            return Err(Error::InvalidOption(format!(
                "dpi must not exceed {}, got {}",
                MAX_DPI, self.dpi
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::InvalidOption("output directory is empty".into()));
        }
        Ok(())
    }

    /// Build the refiner selected by `strategy`.
    pub fn refiner(&self) -> Box<dyn Refiner> {
        match self.strategy {
            RefineStrategy::BlankScan => Box::new(BlankScanRefiner::new(self.white_level)),
            RefineStrategy::TextAnchored => Box::new(TextAnchoredRefiner::new(
                self.white_level,
                self.top_fallback,
            )),
        }
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            threshold: DEFAULT_THRESHOLD,
            strategy: RefineStrategy::TextAnchored,
            white_level: u8::MAX,
            top_fallback: TopFallback::PageTop,
            crop_source: CropSource::First,
        }
    }
}

/// Region refinement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefineStrategy {
    /// Render clipped to the text range; grow upward through blank rows and
    /// stop downward where both renders converge again
    BlankScan,
    /// Render full pages; anchor the top to the nearest text block above the
    /// change, re-render that clip and trim trailing blank rows
    #[default]
    TextAnchored,
}

/// Top edge used when no text block ends above a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopFallback {
    /// Extend the crop to the top of the page
    #[default]
    PageTop,
    /// Anchor at the page's bottom edge; the crop then spans from the bottom
    /// of the change to the bottom of the page
    PageBottom,
}

/// Which of the two compared documents supplies the crop.
///
/// The crop source is also the render that gets resized when page sizes
/// differ and the one scanned for blank rows; the other document is the
/// reference it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropSource {
    /// The first document passed to the comparison
    #[default]
    First,
    /// The second document passed to the comparison
    Second,
}
