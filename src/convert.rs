//! Document composition: the top-level conversion entry points.
//!
//! ```text
//! source ─▶ strategy::select ─▶ normalize ─▶ classify ─▶ Markdown
//!            (assembled, page-marked text)
//! ```
//!
//! Everything here is synchronous. pdfium must not run on an async worker
//! thread, so async callers should use `convert_async` (feature `async`),
//! which moves the whole conversion onto tokio's blocking pool.

use crate::config::{ConversionConfig, Settings};
use crate::error::Pdf2MdError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::assemble::ImageStore;
use crate::pipeline::classify::render_document;
use crate::pipeline::input;
use crate::pipeline::layout::LayoutExtractor;
use crate::pipeline::normalize::normalize;
use crate::pipeline::strategy::{self, Extractors};
use crate::pipeline::text::TextExtractor;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - File not found / permission denied / not a PDF
/// - The image directory could not be created (`extractImages` only)
/// - The selected (or fallback) extraction path failed
/// - No text could be extracted at all
///
/// # Example
/// ```rust,no_run
/// use pdfstruct::{convert, ConversionConfig};
///
/// let config = ConversionConfig::builder()
///     .include_metadata(true)
///     .build()?;
/// let output = convert("report.pdf", &config)?;
/// println!("{}", output.markdown);
/// eprintln!("{} tables via {}", output.stats.tables_found, output.stats.method);
/// # Ok::<(), pdfstruct::Pdf2MdError>(())
/// ```
pub fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let layout = LayoutExtractor::new();
    let text = TextExtractor::new();
    convert_with(
        input,
        config,
        Extractors {
            layout: &layout,
            text: &text,
        },
    )
}

/// [`convert`] with explicit extraction paths.
pub fn convert_with(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
    extractors: Extractors<'_>,
) -> Result<ConversionOutput, Pdf2MdError> {
    let total_start = Instant::now();
    let settings = &config.settings;

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let source = input::resolve_local(input)?;
    info!(
        "Starting conversion: {} (method={})",
        source.display(),
        settings.extraction_method
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(&source);
    }

    // ── Step 2: Prepare image output ─────────────────────────────────────
    let store = if settings.extract_images {
        let store = ImageStore::new(config.images_dir_for(&source))
            .with_progress(config.progress_callback.clone());
        store.ensure_dir()?;
        Some(store)
    } else {
        None
    };

    // ── Step 3: Extract and assemble pages ───────────────────────────────
    let selection = strategy::select(
        &source,
        settings,
        extractors,
        store.as_ref(),
        config.progress_callback.as_ref(),
    )?;
    let extracted = &selection.assembled.text;
    if extracted.trim().is_empty() {
        return Err(Pdf2MdError::EmptyDocument);
    }

    // ── Step 4: Normalise and classify ───────────────────────────────────
    let markdown = compose_markdown(extracted, settings);

    // ── Step 5: Stats ────────────────────────────────────────────────────
    let assembled = &selection.assembled;
    let stats = ConversionStats {
        method: selection.path,
        fallback_used: selection.fallback_used,
        page_count: assembled.page_count,
        tables_found: assembled.tables,
        images_found: assembled.images_found,
        images_saved: assembled.images_saved,
        images_directory: store.as_ref().map(|s| s.dir().to_path_buf()),
        extracted_text_length: extracted.chars().count(),
        markdown_length: markdown.chars().count(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} pages via {} path, {} chars in {}ms",
        stats.page_count, stats.method, stats.markdown_length, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(&stats);
    }

    Ok(ConversionOutput { markdown, stats })
}

/// The text-only half of the pipeline: page-marked text in, Markdown out.
///
/// ```rust
/// use pdfstruct::{compose_markdown, Settings};
///
/// let text = "<!-- Page 1 -->\n1.1 Background\n\n\n* Item one\n-----\nPlain text ends here.";
/// let md = compose_markdown(text, &Settings::default());
/// assert_eq!(md, "### Background\n\n- Item one\nPlain text ends here.");
/// ```
pub fn compose_markdown(text: &str, settings: &Settings) -> String {
    let normalized = normalize(text);
    debug!(
        "Normalised {} → {} chars",
        text.chars().count(),
        normalized.chars().count()
    );
    render_document(&normalized, settings)
}

/// Convert a PDF and write the Markdown to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2MdError> {
    let output = convert(input, config)?;
    write_atomic(output_path.as_ref(), &output.markdown)?;
    Ok(output.stats)
}

/// Async wrapper around [`convert`]; runs on tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn convert_async(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let path = input.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert(&path, &config))
        .await
        .map_err(|e| Pdf2MdError::Internal(format!("Conversion task panicked: {}", e)))?
}

pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), Pdf2MdError> {
    let write_failed = |e: std::io::Error| Pdf2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    let mut file = std::fs::File::create(&tmp_path).map_err(write_failed)?;
    file.write_all(contents.as_bytes()).map_err(write_failed)?;
    file.sync_all().map_err(write_failed)?;
    drop(file);

    std::fs::rename(&tmp_path, path).map_err(write_failed)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
