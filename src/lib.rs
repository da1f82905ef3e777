//! # pdfstruct
//!
//! Recover document structure from PDFs and emit Markdown.
//!
//! PDF text extraction gives back flat lines with every bit of semantic
//! markup gone. This crate puts the structure back with line-level
//! heuristics: headings (with depth), bulleted lists, quotations, pipe
//! tables recovered from text alignment, and links to the embedded images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate path and %PDF magic bytes
//!  ├─ 2. Extract    layout path (pdfium: text, tables, images)
//!  │                or text path (lopdf), with one fallback in auto mode
//!  ├─ 3. Assemble   per page: marker, image links, tables, body text
//!  ├─ 4. Normalise  blank runs, spacing, rule lines
//!  └─ 5. Classify   headings / lists / quotes / body → Markdown
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfstruct::{convert, ConversionConfig, Settings};
//!
//! let settings = Settings::from_json(r#"{"extractionMethod":"auto","extractImages":true}"#)?;
//! let output = convert("document.pdf", &ConversionConfig::from_settings(settings))?;
//! println!("{}", output.markdown);
//! eprintln!(
//!     "{} pages via {} ({} tables, {} images)",
//!     output.stats.page_count,
//!     output.stats.method,
//!     output.stats.tables_found,
//!     output.stats.images_saved,
//! );
//! # Ok::<(), pdfstruct::Pdf2MdError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `async` | off     | Adds `convert_async`, which runs a conversion on tokio's blocking pool |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfstruct = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! The layout path needs the pdfium shared library at runtime. It is bound
//! from `PDFIUM_LIB_PATH` when set, else from the working directory, else
//! from the system library path. In `auto` mode a missing library is just
//! another reason to fall back to the text path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ExtractionMethod, Settings};
#[cfg(feature = "async")]
pub use convert::convert_async;
pub use convert::{compose_markdown, convert, convert_to_file, convert_with};
pub use error::{ExtractionFailure, ImageError, Pdf2MdError};
pub use output::{ConversionOutput, ConversionStats, ExtractionPath};
pub use page::{ImageReference, Page, Table};
pub use pipeline::strategy::{Extractors, PageExtractor};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
