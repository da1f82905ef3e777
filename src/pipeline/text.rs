//! Lightweight text-only extraction via lopdf.
//!
//! Each page's text in page order, without geometry, tables or images.
//! Used directly for `text-only` and as the fallback in `auto` mode.

use crate::error::ExtractionFailure;
use crate::page::Page;
use crate::pipeline::assemble::ImageStore;
use crate::pipeline::strategy::PageExtractor;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info};

/// lopdf-backed [`PageExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Per-page text from an already loaded document.
    pub fn extract_document(&self, doc: &Document) -> Result<Vec<Page>, ExtractionFailure> {
        let mut pages = Vec::new();
        for (number, _) in doc.get_pages() {
            let text = doc
                .extract_text(&[number])
                .map_err(|e| ExtractionFailure::failed(format!("page {number}: {e}")))?;
            debug!("Page {}: {} chars", number, text.len());
            pages.push(Page::with_text(number as usize, text));
        }
        Ok(pages)
    }
}

impl PageExtractor for TextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(
        &self,
        source: &Path,
        _images: Option<&ImageStore>,
    ) -> Result<Vec<Page>, ExtractionFailure> {
        let doc = Document::load(source).map_err(ExtractionFailure::failed)?;
        info!("PDF loaded: {} pages", doc.get_pages().len());
        self.extract_document(&doc)
    }
}
