//! Configuration types for PDF-to-Markdown conversion.
//!
//! Two layers:
//!
//! * [`Settings`]: the three recognised conversion options, exactly as they
//!   arrive in a settings JSON object (`extractionMethod`, `includeMetadata`,
//!   `extractImages`). Unknown keys are ignored and missing keys take their
//!   defaults, so any caller that already speaks that JSON shape can hand it
//!   over unchanged.
//! * [`ConversionConfig`]: the settings plus library-only knobs (image
//!   directory override, progress callback), built via
//!   [`ConversionConfigBuilder`].
//!
//! Nothing in the pipeline mutates either value once built.

use crate::error::Pdf2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the directory, next to the source document, that receives
/// extracted images.
pub const IMAGES_DIR_NAME: &str = "extracted_images";

/// Which extraction path produces the document text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExtractionMethod {
    /// Layout-aware path first, lightweight path when it fails or is blank.
    #[default]
    Auto,
    /// Lightweight (text-only) path only.
    TextOnly,
    /// Layout-aware path only. Any value other than `auto` / `text-only`
    /// selects this; the original spelling is kept for logs.
    Layout(String),
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &str {
        match self {
            ExtractionMethod::Auto => "auto",
            ExtractionMethod::TextOnly => "text-only",
            ExtractionMethod::Layout(name) => name,
        }
    }
}

impl From<String> for ExtractionMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "auto" => ExtractionMethod::Auto,
            "text-only" => ExtractionMethod::TextOnly,
            _ => ExtractionMethod::Layout(value),
        }
    }
}

impl From<&str> for ExtractionMethod {
    fn from(value: &str) -> Self {
        ExtractionMethod::from(value.to_string())
    }
}

impl From<ExtractionMethod> for String {
    fn from(method: ExtractionMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recognised conversion options.
///
/// # Example
/// ```rust
/// use pdfstruct::{ExtractionMethod, Settings};
///
/// let settings = Settings::from_json(r#"{"extractionMethod":"text-only","outputFormat":"github"}"#).unwrap();
/// assert_eq!(settings.extraction_method, ExtractionMethod::TextOnly);
/// assert!(!settings.include_metadata);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// `auto` (default), `text-only`, or anything else for layout-aware.
    pub extraction_method: ExtractionMethod,

    /// Keep `<!-- Page N -->` markers in the final Markdown. Default: false.
    pub include_metadata: bool,

    /// Extract embedded images to PNG files and link them. Default: false.
    pub extract_images: bool,
}

impl Settings {
    /// Parse a settings JSON object. An empty string means "all defaults".
    pub fn from_json(json: &str) -> Result<Self, Pdf2MdError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| Pdf2MdError::InvalidSettings(e.to_string()))
    }
}

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfstruct::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .extraction_method("text-only")
///     .include_metadata(true)
///     .build()
///     .unwrap();
/// assert!(config.settings.include_metadata);
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// The three recognised options.
    pub settings: Settings,

    /// Where extracted images go. Default: `extracted_images/` beside the
    /// source document.
    pub images_dir: Option<PathBuf>,

    /// Optional progress observer. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("settings", &self.settings)
            .field("images_dir", &self.images_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Wrap bare settings with no callback and the default image directory.
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Resolve the directory extracted images are written to for `source`.
    pub fn images_dir_for(&self, source: &Path) -> PathBuf {
        match self.images_dir {
            Some(ref dir) => dir.clone(),
            None => default_images_dir(source),
        }
    }
}

/// `extracted_images/` colocated with the source document.
pub fn default_images_dir(source: &Path) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(IMAGES_DIR_NAME)
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.config.settings = settings;
        self
    }

    pub fn extraction_method(mut self, method: impl Into<ExtractionMethod>) -> Self {
        self.config.settings.extraction_method = method.into();
        self
    }

    pub fn include_metadata(mut self, v: bool) -> Self {
        self.config.settings.include_metadata = v;
        self
    }

    pub fn extract_images(mut self, v: bool) -> Self {
        self.config.settings.extract_images = v;
        self
    }

    pub fn images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.images_dir = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2MdError> {
        if let Some(ref dir) = self.config.images_dir {
            if dir.as_os_str().is_empty() {
                return Err(Pdf2MdError::InvalidSettings(
                    "image directory must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
