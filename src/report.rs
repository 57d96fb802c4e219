//! Comparison results.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::DiffRegion;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One saved crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropResult {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Changed region in pixel space of the compared renders
    pub region: DiffRegion,

    /// Crop width in pixels
    pub width: u32,

    /// Crop height in pixels
    pub height: u32,

    /// File the crop was written to
    pub path: PathBuf,
}

/// Outcome of comparing two documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// First compared document, when it was opened from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<PathBuf>,

    /// Second compared document, when it was opened from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<PathBuf>,

    /// Number of page pairs compared
    pub pages_compared: usize,

    /// Pages present in only one of the documents
    pub pages_unmatched: usize,

    /// Saved crops in processing order
    pub crops: Vec<CropResult>,
}

impl DiffReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of all written crops, in processing order.
    pub fn paths(&self) -> Vec<&Path> {
        self.crops.iter().map(|crop| crop.path.as_path()).collect()
    }

    /// Whether any page differed.
    pub fn has_differences(&self) -> bool {
        !self.crops.is_empty()
    }

    /// Serialize the report.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let result = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self),
            JsonFormat::Compact => serde_json::to_string(self),
        };

        result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiffReport {
        DiffReport {
            before: Some(PathBuf::from("docs/v1.pdf")),
            after: Some(PathBuf::from("docs/v2.pdf")),
            pages_compared: 2,
            pages_unmatched: 1,
            crops: vec![CropResult {
                page_number: 2,
                region: DiffRegion::new(10, 20, 30, 40),
                width: 100,
                height: 50,
                path: PathBuf::from("images/page_2_diff.png"),
            }],
        }
    }

    #[test]
    fn test_paths() {
        let report = sample();
        assert!(report.has_differences());
        assert_eq!(report.paths(), vec![Path::new("images/page_2_diff.png")]);
        assert!(!DiffReport::new().has_differences());
    }

    #[test]
    fn test_to_json_pretty() {
        let json = sample().to_json(JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"pages_compared\": 2"));
        assert!(json.contains("page_2_diff.png"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = sample().to_json(JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        assert!(json.contains("\"before\":\"docs/v1.pdf\""));

        let parsed: DiffReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
        assert_eq!(parsed.after, Some(PathBuf::from("docs/v2.pdf")));
    }

    #[test]
    fn test_to_json_omits_unknown_inputs() {
        let json = DiffReport::new().to_json(JsonFormat::Compact).unwrap();
        assert!(!json.contains("before"));

        let parsed: DiffReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.before, None);
    }
}
