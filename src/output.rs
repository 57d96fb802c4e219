//! Collision-free PNG output.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::Result;

/// Base file name for the crop of a 1-based page number.
pub fn diff_file_name(page_number: u32) -> String {
    format!("page_{}_diff.png", page_number)
}

/// First path in `dir` not taken yet: `base_name` itself, then
/// `stem_1.ext`, `stem_2.ext`, and so on.
///
/// Only checks existence at call time; concurrent writers can still race.
pub fn unique_path(dir: &Path, base_name: &str) -> PathBuf {
    let candidate = dir.join(base_name);
    if !candidate.exists() {
        return candidate;
    }

    let base = Path::new(base_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base_name.to_string());
    let extension = base.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|counter| {
            let name = match &extension {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            dir.join(name)
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Writes crops into an output directory without overwriting anything.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Create a writer, creating the directory if it does not exist.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save the crop of a page as PNG under a free name and return its path.
    pub fn write(&self, image: &RgbImage, page_number: u32) -> Result<PathBuf> {
        let path = unique_path(&self.dir, &diff_file_name(page_number));
        image.save_with_format(&path, ImageFormat::Png)?;
        log::info!(
            "wrote {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(path)
    }
}
