//! Page assembly: merge one page's text, tables and images into page-marked
//! text, and own the directory extracted images are written to.
//!
//! Per page, the order is fixed:
//!
//! ```text
//! <!-- Page N -->
//! ![Image from page N](path)      one per saved image (extractImages only)
//!
//! | table | ... |                 one block per table, blank-line separated
//!
//! body text
//! ```

use crate::config::Settings;
use crate::error::{ImageError, Pdf2MdError};
use crate::page::{ImageReference, Page};
use crate::pipeline::table;
use crate::progress::ProgressCallback;
use image::DynamicImage;
use std::cell::Cell;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Page-marked text for a whole document, plus what went into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledText {
    pub text: String,
    pub page_count: usize,
    pub tables: usize,
    pub images_found: usize,
    pub images_saved: usize,
}

/// Assemble every page in order.
pub fn assemble_document(
    pages: &[Page],
    settings: &Settings,
    progress: Option<&ProgressCallback>,
) -> AssembledText {
    let mut out = AssembledText {
        page_count: pages.len(),
        ..AssembledText::default()
    };

    for page in pages {
        let (block, tables) = assemble_page_counted(page, settings);
        out.tables += tables;
        if settings.extract_images {
            out.images_saved += page.images.len();
            out.images_found += page.images.len() + page.skipped_images;
        }
        if let Some(cb) = progress {
            cb.on_page_assembled(page.number, pages.len(), block.len());
        }
        out.text.push_str(&block);
    }

    out
}

/// Assemble one page. A page with nothing to show contributes nothing, not
/// even its marker.
pub fn assemble_page(page: &Page, settings: &Settings) -> String {
    assemble_page_counted(page, settings).0
}

fn assemble_page_counted(page: &Page, settings: &Settings) -> (String, usize) {
    let tables: Vec<String> = page
        .tables
        .iter()
        .map(table::transcode)
        .filter(|t| !t.is_empty())
        .collect();
    let images: &[ImageReference] = if settings.extract_images {
        &page.images
    } else {
        &[]
    };

    if page.body().is_none() && tables.is_empty() && images.is_empty() {
        debug!("Page {} has no content, skipping", page.number);
        return (String::new(), 0);
    }

    let mut out = format!("\n<!-- Page {} -->\n", page.number);

    for image in images {
        out.push_str(&format!(
            "![Image from page {}]({})\n",
            page.number,
            link_destination(&image.path)
        ));
    }

    for t in &tables {
        out.push('\n');
        out.push_str(t);
        out.push_str("\n\n");
    }

    if page.body().is_some() {
        if let Some(ref text) = page.text {
            out.push_str(text);
            out.push('\n');
        }
    }

    (out, tables.len())
}

/// Markdown link destination for `path`. Each component is percent-encoded,
/// so spaces neither end the link nor get collapsed by normalisation.
pub fn link_destination(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            Component::CurDir => push_segment(&mut out, "."),
            Component::ParentDir => push_segment(&mut out, ".."),
            Component::Normal(name) => {
                push_segment(&mut out, &urlencoding::encode(&name.to_string_lossy()))
            }
        }
    }
    out
}

fn push_segment(out: &mut String, segment: &str) {
    if !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(segment);
}

// ── Image output directory ───────────────────────────────────────────────────

/// Destination for extracted images: `page_<N>_image_<M>.png` files in one
/// directory, created at most once per document.
pub struct ImageStore {
    dir: PathBuf,
    created: Cell<bool>,
    progress: Option<ProgressCallback>,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            created: Cell::new(false),
            progress: None,
        }
    }

    /// Report saved and skipped images to `progress`.
    pub fn with_progress(mut self, progress: Option<ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if this store has not done so yet. An existing
    /// directory is not an error.
    pub fn ensure_dir(&self) -> Result<&Path, Pdf2MdError> {
        if !self.created.get() {
            std::fs::create_dir_all(&self.dir).map_err(|e| Pdf2MdError::ImageDirectory {
                path: self.dir.clone(),
                source: e,
            })?;
            debug!("Image directory ready: {}", self.dir.display());
            self.created.set(true);
        }
        Ok(&self.dir)
    }

    /// Deterministic file path for the `index`-th image of page `page`.
    pub fn image_path(&self, page: usize, index: usize) -> PathBuf {
        self.dir.join(format!("page_{page}_image_{index}.png"))
    }

    /// Write `image` as PNG and return its reference.
    pub fn save(
        &self,
        page: usize,
        index: usize,
        image: &DynamicImage,
    ) -> Result<ImageReference, ImageError> {
        let save_failed = |detail: String| ImageError::SaveFailed {
            page,
            index,
            detail,
        };

        self.ensure_dir().map_err(|e| save_failed(e.to_string()))?;
        let path = self.image_path(page, index);
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| save_failed(e.to_string()))?;

        let path = std::fs::canonicalize(&path).unwrap_or(path);
        debug!("Saved image {}", path.display());
        if let Some(ref cb) = self.progress {
            cb.on_image_saved(page, index, &path);
        }
        Ok(ImageReference { path, page, index })
    }

    /// Save one page's images in order, numbering them from 1. An image
    /// that failed to decode (`Err(detail)`) or to save is skipped; the
    /// rest are still written under their own index.
    pub fn save_page<I>(&self, page: usize, images: I) -> (Vec<ImageReference>, usize)
    where
        I: IntoIterator<Item = Result<DynamicImage, String>>,
    {
        let mut saved = Vec::new();
        let mut skipped = 0;

        for (i, decoded) in images.into_iter().enumerate() {
            let index = i + 1;
            let result = decoded
                .map_err(|detail| ImageError::DecodeFailed {
                    page,
                    index,
                    detail,
                })
                .and_then(|image| self.save(page, index, &image));

            match result {
                Ok(reference) => saved.push(reference),
                Err(e) => {
                    self.skip(&e);
                    skipped += 1;
                }
            }
        }

        (saved, skipped)
    }

    /// Log a skipped image and tell the observer. Never fatal.
    pub fn skip(&self, err: &ImageError) {
        warn!("Skipping image: {}", err);
        if let Some(ref cb) = self.progress {
            let (page, index) = err.position();
            cb.on_image_error(page, index, &err.to_string());
        }
    }
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("dir", &self.dir)
            .field("created", &self.created.get())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
