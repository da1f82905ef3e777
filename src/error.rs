//! Error types for the pdfstruct library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`Pdf2MdError`]: **Fatal**: the conversion cannot produce a document
//!   (bad input file, every extraction path failed, nothing usable was
//!   extracted). Returned as `Err(Pdf2MdError)` from the top-level
//!   `convert*` functions.
//!
//! * [`ExtractionFailure`]: **Recoverable**: one extraction path raised or
//!   produced nothing. The strategy selector inspects it and decides whether
//!   to try the other path or surface it as [`Pdf2MdError::Extraction`].
//!
//! * [`ImageError`]: **Non-fatal**: a single embedded image could not be
//!   decoded or saved. The image is skipped; the page and document continue.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfstruct library.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The selected extraction path (or the fallback path) failed.
    #[error("{method} extraction failed: {reason}")]
    Extraction { method: String, reason: String },

    /// Every extraction attempt yielded no usable text.
    #[error("No text could be extracted from the PDF")]
    EmptyDocument,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Settings JSON could not be parsed.
    #[error("Invalid settings JSON: {0}")]
    InvalidSettings(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The extracted-images directory could not be created.
    #[error("Failed to create image directory '{path}': {source}")]
    ImageDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library in the working\n\
directory, or install it system-wide. Use --method text-only to skip pdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a single extraction attempt produced nothing usable.
///
/// The strategy selector branches on this tag instead of unwinding: a
/// `Blank` result in auto mode is as good a reason to fall back as a
/// `Failed` one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// The extraction library raised an error.
    #[error("{0}")]
    Failed(String),

    /// Extraction succeeded but produced only whitespace.
    #[error("extracted text is blank")]
    Blank,
}

impl ExtractionFailure {
    pub fn failed(detail: impl std::fmt::Display) -> Self {
        ExtractionFailure::Failed(detail.to_string())
    }
}

/// A non-fatal error for a single embedded image.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// The image object could not be decoded into a raster.
    #[error("Page {page}, image {index}: decode failed: {detail}")]
    DecodeFailed {
        page: usize,
        index: usize,
        detail: String,
    },

    /// The PNG could not be written to disk.
    #[error("Page {page}, image {index}: save failed: {detail}")]
    SaveFailed {
        page: usize,
        index: usize,
        detail: String,
    },
}

impl ImageError {
    /// `(page, index)` of the image that failed.
    pub fn position(&self) -> (usize, usize) {
        match self {
            ImageError::DecodeFailed { page, index, .. }
            | ImageError::SaveFailed { page, index, .. } => (*page, *index),
        }
    }
}
