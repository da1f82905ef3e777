//! Layout-aware extraction via pdfium.
//!
//! This is the only path that yields tables and images. Per page it reads:
//!
//! * the full page text (`PdfPageText::all`), used verbatim as the body;
//! * positioned text segments, fed to [`TableDetector`];
//! * embedded image objects, written through the [`ImageStore`] when one
//!   is supplied.
//!
//! pdfium is not async-safe; everything here is blocking and scoped to one
//! call. The document handle drops at the end of [`LayoutExtractor::extract`].

use crate::error::{ExtractionFailure, Pdf2MdError};
use crate::page::{ImageReference, Page};
use crate::pipeline::assemble::ImageStore;
use crate::pipeline::detect::{TableDetector, TextFragment};
use crate::pipeline::strategy::PageExtractor;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a pdfium library file or its directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the working directory,
/// then the system library.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2MdError> {
    let mut attempts: Vec<String> = Vec::new();

    if let Ok(value) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let path = library_file(Path::new(&value));
        match Pdfium::bind_to_library(&path) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", path.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {:?}", path.display(), e)),
        }
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    match Pdfium::bind_to_library(&local) {
        Ok(bindings) => {
            debug!("Bound pdfium from {}", local.display());
            return Ok(Pdfium::new(bindings));
        }
        Err(e) => attempts.push(format!("{}: {:?}", local.display(), e)),
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound system pdfium");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {:?}", e));
            Err(Pdf2MdError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

/// A directory resolves to the platform library name inside it.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

/// pdfium-backed [`PageExtractor`].
#[derive(Debug, Clone, Default)]
pub struct LayoutExtractor {
    detector: TableDetector,
}

impl LayoutExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn extract_page(
        &self,
        number: usize,
        page: &PdfPage,
        images: Option<&ImageStore>,
    ) -> Result<Page, ExtractionFailure> {
        let text = page
            .text()
            .map_err(|e| ExtractionFailure::failed(format!("page {number}: {e:?}")))?;

        let body = text.all();
        let fragments: Vec<TextFragment> = text
            .segments()
            .iter()
            .map(|segment| {
                let bounds = segment.bounds();
                TextFragment::new(
                    segment.text(),
                    bounds.left().value,
                    bounds.bottom().value,
                    bounds.right().value,
                    bounds.top().value,
                )
            })
            .collect();
        let tables = self.detector.detect(&fragments);

        let mut out = Page {
            number,
            text: Some(body),
            tables,
            ..Page::default()
        };

        if let Some(store) = images {
            let (saved, skipped) = save_images(number, page, store);
            out.images = saved;
            out.skipped_images = skipped;
        }

        debug!(
            "Page {}: {} chars, {} table(s), {} image(s)",
            number,
            out.text.as_deref().map(str::len).unwrap_or(0),
            out.tables.len(),
            out.images.len()
        );
        Ok(out)
    }
}

/// Save every image object on `page`. Failures are reported and counted,
/// never propagated.
fn save_images(number: usize, page: &PdfPage, store: &ImageStore) -> (Vec<ImageReference>, usize) {
    let decoded = page.objects().iter().filter_map(|object| {
        object
            .as_image_object()
            .map(|image| image.get_raw_image().map_err(|e| format!("{e:?}")))
    });
    store.save_page(number, decoded)
}

impl PageExtractor for LayoutExtractor {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extract(
        &self,
        source: &Path,
        images: Option<&ImageStore>,
    ) -> Result<Vec<Page>, ExtractionFailure> {
        let pdfium = bind_pdfium().map_err(ExtractionFailure::failed)?;
        let document = pdfium
            .load_pdf_from_file(source, None)
            .map_err(|e| ExtractionFailure::failed(format!("{e:?}")))?;

        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        pages
            .iter()
            .enumerate()
            .map(|(i, page)| self.extract_page(i + 1, &page, images))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_file_keeps_file_paths() {
        let p = Path::new("/opt/pdfium/lib/libpdfium.so");
        assert_eq!(library_file(p), p.to_path_buf());
    }

    #[test]
    fn test_library_file_resolves_directories() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = library_file(dir.path());
        assert!(resolved.starts_with(dir.path()));
        assert_ne!(resolved, dir.path().to_path_buf());
    }
}
