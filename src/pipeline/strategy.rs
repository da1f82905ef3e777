//! Extraction strategy: which path produces the page-marked text.
//!
//! | `extractionMethod` | behaviour                                          |
//! |--------------------|----------------------------------------------------|
//! | `auto` (default)   | layout first; on failure *or blank text*, text path |
//! | `text-only`        | text path only                                     |
//! | anything else      | layout path only                                   |
//!
//! Each attempt is evaluated as a value: an [`ExtractionFailure`] is either
//! `Failed` (the library raised) or `Blank` (it succeeded with nothing to
//! say). Auto mode falls back once on either; no other retries happen.
//! An empty final result is not an error here. The composer decides that.

use crate::config::{ExtractionMethod, Settings};
use crate::error::{ExtractionFailure, Pdf2MdError};
use crate::output::ExtractionPath;
use crate::page::Page;
use crate::pipeline::assemble::{assemble_document, AssembledText, ImageStore};
use crate::progress::ProgressCallback;
use std::path::Path;
use tracing::{info, warn};

/// One upstream extraction path: source document in, pages out.
pub trait PageExtractor {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Extract every page in order. `images` is `Some` only when images
    /// should be written; extractors without image support ignore it.
    fn extract(
        &self,
        source: &Path,
        images: Option<&ImageStore>,
    ) -> Result<Vec<Page>, ExtractionFailure>;
}

/// The two extraction paths available to the selector.
#[derive(Clone, Copy)]
pub struct Extractors<'a> {
    pub layout: &'a dyn PageExtractor,
    pub text: &'a dyn PageExtractor,
}

/// What the selector settled on.
#[derive(Debug, Clone)]
pub struct Selection {
    pub assembled: AssembledText,
    pub path: ExtractionPath,
    pub fallback_used: bool,
}

/// Run the configured strategy and return the assembled page-marked text.
pub fn select(
    source: &Path,
    settings: &Settings,
    extractors: Extractors<'_>,
    images: Option<&ImageStore>,
    progress: Option<&ProgressCallback>,
) -> Result<Selection, Pdf2MdError> {
    let run = |path: ExtractionPath| {
        let (extractor, images) = match path {
            ExtractionPath::Layout => (extractors.layout, images),
            ExtractionPath::Text => (extractors.text, None),
        };
        attempt(path, extractor, source, settings, images, progress)
    };

    match settings.extraction_method {
        ExtractionMethod::TextOnly => {
            let assembled = run(ExtractionPath::Text).map_err(|e| fatal(extractors.text, e))?;
            Ok(Selection {
                assembled,
                path: ExtractionPath::Text,
                fallback_used: false,
            })
        }
        ExtractionMethod::Layout(ref name) => {
            info!("Extraction method '{}' selects the layout path", name);
            let assembled =
                run(ExtractionPath::Layout).map_err(|e| fatal(extractors.layout, e))?;
            Ok(Selection {
                assembled,
                path: ExtractionPath::Layout,
                fallback_used: false,
            })
        }
        ExtractionMethod::Auto => {
            let first = run(ExtractionPath::Layout).and_then(|a| {
                if a.text.trim().is_empty() {
                    Err(ExtractionFailure::Blank)
                } else {
                    Ok(a)
                }
            });

            match first {
                Ok(assembled) => Ok(Selection {
                    assembled,
                    path: ExtractionPath::Layout,
                    fallback_used: false,
                }),
                Err(reason) => {
                    warn!(
                        "{} extraction unusable ({}), falling back to {}",
                        extractors.layout.name(),
                        reason,
                        extractors.text.name()
                    );
                    if let Some(cb) = progress {
                        cb.on_fallback(ExtractionPath::Layout, &reason.to_string());
                    }
                    let assembled =
                        run(ExtractionPath::Text).map_err(|e| fatal(extractors.text, e))?;
                    Ok(Selection {
                        assembled,
                        path: ExtractionPath::Text,
                        fallback_used: true,
                    })
                }
            }
        }
    }
}

fn attempt(
    path: ExtractionPath,
    extractor: &dyn PageExtractor,
    source: &Path,
    settings: &Settings,
    images: Option<&ImageStore>,
    progress: Option<&ProgressCallback>,
) -> Result<AssembledText, ExtractionFailure> {
    info!("Extracting with the {} path ({})", path, extractor.name());
    if let Some(cb) = progress {
        cb.on_extraction_start(path);
    }

    let pages = extractor.extract(source, images)?;
    Ok(assemble_document(&pages, settings, progress))
}

fn fatal(extractor: &dyn PageExtractor, failure: ExtractionFailure) -> Pdf2MdError {
    Pdf2MdError::Extraction {
        method: extractor.name().to_string(),
        reason: failure.to_string(),
    }
}
