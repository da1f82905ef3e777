//! CLI binary for pdfstruct.
//!
//! A thin shim over the library crate that maps CLI flags and the optional
//! settings JSON to `ConversionConfig` and prints the Markdown.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfstruct::{
    convert, convert_to_file, ConversionConfig, ConversionProgressCallback, ConversionStats,
    ExtractionPath, ProgressCallback, Settings,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while a path extracts, a page bar
/// while pages are assembled, and one line per notable event.
struct CliProgressCallback {
    bar: ProgressBar,
    images_saved: AtomicUsize,
    image_errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            images_saved: AtomicUsize::new(0),
            image_errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        if self.bar.length() == Some(total as u64) {
            return;
        }
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Assembling");
    }
}

/// Clears the progress bar when dropped, so an error exit leaves no
/// spinner frame above the error message.
struct ProgressGuard(Option<Arc<CliProgressCallback>>);

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        if let Some(ref cb) = self.0 {
            if !cb.bar.is_finished() {
                cb.bar.finish_and_clear();
            }
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, source: &Path) {
        self.bar.set_message(source.display().to_string());
    }

    fn on_extraction_start(&self, path: ExtractionPath) {
        self.bar.set_position(0);
        self.bar.set_prefix("Extracting");
        self.bar.set_message(format!("{path} path…"));
    }

    fn on_fallback(&self, from: ExtractionPath, reason: &str) {
        self.bar.println(format!(
            "  {} {} path unusable ({}), falling back to text",
            yellow("⚠"),
            from,
            dim(reason)
        ));
    }

    fn on_page_assembled(&self, page_num: usize, total_pages: usize, text_len: usize) {
        self.activate_bar(total_pages);
        self.bar.set_position(page_num as u64);
        self.bar.set_message(dim(&format!("page {page_num}: {text_len} chars")));
    }

    fn on_image_saved(&self, _page_num: usize, _index: usize, _path: &Path) {
        self.images_saved.fetch_add(1, Ordering::SeqCst);
    }

    fn on_image_error(&self, page_num: usize, index: usize, error: &str) {
        self.image_errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} Page {:>3} image {}  {}",
            red("✗"),
            page_num,
            index,
            red(error)
        ));
    }

    fn on_conversion_complete(&self, stats: &ConversionStats) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages via {} path{}",
            green("✔"),
            bold(&stats.page_count.to_string()),
            stats.method,
            if stats.fallback_used {
                " (fallback)"
            } else {
                ""
            }
        );
        let saved = self.images_saved.load(Ordering::SeqCst);
        let failed = self.image_errors.load(Ordering::SeqCst);
        if saved + failed > 0 {
            eprintln!(
                "   {} images saved, {} skipped",
                dim(&saved.to_string()),
                dim(&failed.to_string())
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  pdf2md document.pdf

  # Settings JSON, as accepted by the library
  pdf2md document.pdf '{"extractionMethod":"text-only","includeMetadata":true}'

  # Convert to file, extracting images next to the PDF
  pdf2md --images document.pdf -o output.md

  # JSON output with stats
  pdf2md --json document.pdf > output.json

EXTRACTION METHODS:
  auto        layout path (pdfium), text path (lopdf) if it fails or is blank
  text-only   text path only
  <other>     layout path only; the only path that yields tables and images

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   pdfium library file or directory (else ./, else system)
  RUST_LOG          tracing filter, overrides -v / -q
"#;

/// Convert PDF files to structured Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert PDF files to structured Markdown",
    long_about = "Convert PDF documents to Markdown, recovering headings, lists, quotes, \
tables and images from the extracted text.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Settings JSON: {"extractionMethod", "includeMetadata", "extractImages"}.
    settings: Option<String>,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "PDF2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Extraction method: auto, text-only, or anything else for layout only.
    #[arg(long, env = "PDF2MD_METHOD")]
    method: Option<String>,

    /// Keep <!-- Page N --> markers in the output.
    #[arg(long, env = "PDF2MD_METADATA")]
    metadata: bool,

    /// Extract embedded images as PNG and link them.
    #[arg(long, env = "PDF2MD_IMAGES")]
    images: bool,

    /// Directory for extracted images (default: extracted_images/ beside the PDF).
    #[arg(long, env = "PDF2MD_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Output structured JSON (ConversionOutput) instead of Markdown.
    #[arg(long, env = "PDF2MD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs are noise next to the progress bar.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new);
    let _guard = ProgressGuard(cli_progress.clone());
    let progress_cb: Option<ProgressCallback> = cli_progress
        .map(|cb| cb as Arc<dyn ConversionProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = convert_to_file(&cli.input, output_path, &config)
            .with_context(|| format!("Conversion of {} failed", cli.input.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} pages  {}ms  →  {}",
                green("✔"),
                stats.page_count,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let output = convert(&cli.input, &config)
            .with_context(|| format!("Conversion of {} failed", cli.input.display()))?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if cli.json {
            serde_json::to_writer_pretty(&mut handle, &output)
                .context("Failed to serialise output")?;
            handle.write_all(b"\n").context("Failed to write to stdout")?;
        } else {
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").context("Failed to write to stdout")?;
            }
        }

        if !cli.quiet && !show_progress && !cli.json {
            eprintln!(
                "Converted {} pages via {} path in {}ms",
                output.stats.page_count, output.stats.method, output.stats.total_duration_ms
            );
        }
    }

    Ok(())
}

/// Map the settings JSON and CLI flags to `ConversionConfig`. Flags win.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let settings = match cli.settings {
        Some(ref json) => Settings::from_json(json).context("Failed to parse settings JSON")?,
        None => Settings::default(),
    };

    let mut builder = ConversionConfig::builder().settings(settings);
    if let Some(ref method) = cli.method {
        builder = builder.extraction_method(method.as_str());
    }
    if cli.metadata {
        builder = builder.include_metadata(true);
    }
    if cli.images {
        builder = builder.extract_images(true);
    }
    if let Some(ref dir) = cli.images_dir {
        builder = builder.images_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
