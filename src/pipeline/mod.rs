//! Pipeline stages for PDF-to-Markdown structure recovery.
//!
//! Each submodule implements exactly one transformation step, so each can
//! be tested without a PDF.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ strategy ──▶ assemble ──▶ normalize ──▶ classify
//! (path)    (layout|text)  (per page)   (cleanup)     (Markdown)
//!              │              │
//!              │              └─ table (grid → pipe table)
//!              └─ layout: pdfium + detect (tables) + images
//!                 text:   lopdf
//! ```
//!
//! 1. [`input`]: validate the source path and `%PDF` magic bytes
//! 2. [`strategy`]: pick the extraction path, falling back once in auto mode
//! 3. [`layout`] / [`text`]: the two [`strategy::PageExtractor`]s
//! 4. [`detect`]: recover table grids from positioned text
//! 5. [`assemble`]: page marker, image links, tables, body text
//! 6. [`table`]: grid of optional cells → GFM pipe table
//! 7. [`normalize`]: idempotent whitespace and rule-line cleanup
//! 8. [`classify`]: headings, lists, quotes, body

pub mod assemble;
pub mod classify;
pub mod detect;
pub mod input;
pub mod layout;
pub mod normalize;
pub mod strategy;
pub mod table;
pub mod text;
