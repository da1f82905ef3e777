//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline runs. The library itself never prints; everything
//! a caller might want to show (which path ran, whether it fell back, which
//! images were written) arrives here instead.
//!
//! # Example
//!
//! ```rust
//! use pdfstruct::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for PageCounter {
//!     fn on_page_assembled(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} assembled ({} chars)", page_num, total_pages, text_len);
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { pages: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{ConversionStats, ExtractionPath};
use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipeline as it runs.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is single-threaded, but the trait is
/// `Send + Sync` so one observer can be shared with an async host.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first extraction attempt.
    ///
    /// # Arguments
    /// * `source`: path of the document being converted
    fn on_conversion_start(&self, source: &Path) {
        let _ = source;
    }

    /// Called before each extraction path is tried.
    fn on_extraction_start(&self, path: ExtractionPath) {
        let _ = path;
    }

    /// Called when auto mode abandons the layout-aware path.
    ///
    /// # Arguments
    /// * `from`: the path that failed or came back blank
    /// * `reason`: human-readable reason
    fn on_fallback(&self, from: ExtractionPath, reason: &str) {
        let _ = (from, reason);
    }

    /// Called once per page after its text, tables and images are merged.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: pages returned by the extractor
    /// * `text_len`: byte length of the page's contribution
    fn on_page_assembled(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called after an embedded image is written as PNG.
    fn on_image_saved(&self, page_num: usize, index: usize, path: &Path) {
        let _ = (page_num, index, path);
    }

    /// Called when one image is skipped because it could not be decoded or
    /// saved. The conversion continues.
    fn on_image_error(&self, page_num: usize, index: usize, error: &str) {
        let _ = (page_num, index, error);
    }

    /// Called once after the Markdown is produced.
    fn on_conversion_complete(&self, stats: &ConversionStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
