//! Conversion output and statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One of the two upstream extraction paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPath {
    /// pdfium-backed: text, tables and images.
    #[default]
    Layout,
    /// lopdf-backed: text only.
    Text,
}

impl ExtractionPath {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionPath::Layout => "layout",
            ExtractionPath::Text => "text",
        }
    }
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The final Markdown document.
    pub markdown: String,
    /// What the run did to get there.
    pub stats: ConversionStats,
}

/// Per-run statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// The path whose text was used.
    pub method: ExtractionPath,
    /// True when auto mode abandoned the layout path.
    pub fallback_used: bool,
    /// Pages returned by the winning extractor.
    pub page_count: usize,
    /// Tables that transcoded to a non-empty pipe table.
    pub tables_found: usize,
    /// Embedded images encountered, saved or skipped.
    pub images_found: usize,
    /// PNG files written to disk.
    pub images_saved: usize,
    /// Where images were written, when image extraction ran.
    pub images_directory: Option<PathBuf>,
    /// Characters of page-marked text before normalisation.
    pub extracted_text_length: usize,
    /// Characters in the final Markdown.
    pub markdown_length: usize,
    /// Wall-clock duration of the run.
    pub total_duration_ms: u64,
}
