//! Line classification: recover structural roles from unmarked text lines.
//!
//! Every non-blank line is assigned exactly one [`LineKind`] by a fixed
//! sequence of checks; the first check that matches wins:
//!
//! 1. page marker (`<!-- Page N -->`)
//! 2. assembler markup (pipe-table rows, image links), passed through
//! 3. heading (upper-case, numbered section, or short unpunctuated line)
//! 4. list item (`-`, `•` or `*` bullet)
//! 5. quote (opening double quote)
//! 6. body text
//!
//! The short-unpunctuated-line rule is deliberately broad and will promote
//! some ordinary short sentences to headings. Its thresholds are kept as-is;
//! it only steps aside for lines that carry an explicit list or quote
//! marker.

use crate::config::Settings;
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper-case lines shorter than this many chars are headings.
const MAX_UPPERCASE_HEADING_CHARS: usize = 100;
/// Unpunctuated lines shorter than this many chars are headings.
const MAX_SHORT_HEADING_CHARS: usize = 80;
/// Lines shorter than this are never headings.
const MIN_HEADING_CHARS: usize = 3;

const PAGE_MARKER_PREFIX: &str = "<!-- Page";
const TABLE_ROW_PREFIX: char = '|';
const IMAGE_LINK_PREFIX: &str = "![";
const TERMINAL_PUNCTUATION: [char; 4] = ['.', '!', '?', ','];
const QUOTE_OPENERS: [char; 2] = ['"', '\u{201C}'];

static RE_NUMBERED_SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+[A-Z]").unwrap());
static RE_LEVEL_4: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+\s").unwrap());
static RE_LEVEL_3: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\s").unwrap());
static RE_LEVEL_2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());
static RE_NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*\.?\s+").unwrap());
static RE_LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-•*]\s+").unwrap());

/// The structural role of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `<!-- Page N -->` inserted between pages.
    PageMarker,
    /// A pipe-table row or image link emitted by the page assembler.
    Markup,
    /// A heading of depth 1–4.
    Heading(u8),
    /// A bulleted list item.
    ListItem,
    /// A quotation.
    Quote,
    /// Plain paragraph text.
    Body,
}

/// Classify one trimmed, non-blank line.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with(PAGE_MARKER_PREFIX) {
        LineKind::PageMarker
    } else if is_markup(line) {
        LineKind::Markup
    } else if is_heading(line) {
        LineKind::Heading(heading_level(line))
    } else if is_list_item(line) {
        LineKind::ListItem
    } else if is_quote(line) {
        LineKind::Quote
    } else {
        LineKind::Body
    }
}

/// Render one line as Markdown.
///
/// The line is trimmed first. Returns `None` when the line produces no
/// output at all (a page marker with `include_metadata` off); a blank line
/// renders as an empty string.
pub fn render_line(line: &str, settings: &Settings) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return Some(String::new());
    }

    let rendered = match classify(line) {
        LineKind::PageMarker => {
            if !settings.include_metadata {
                return None;
            }
            line.to_string()
        }
        LineKind::Heading(level) => {
            format!("{} {}", "#".repeat(level as usize), clean_heading(line))
        }
        LineKind::ListItem => format!("- {}", strip_bullet(line)),
        LineKind::Quote => format!("> {line}"),
        LineKind::Markup | LineKind::Body => line.to_string(),
    };
    Some(rendered)
}

/// Render normalised document text line by line.
pub fn render_document(text: &str, settings: &Settings) -> String {
    text.split('\n')
        .filter_map(|line| render_line(line, settings))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_markup(line: &str) -> bool {
    line.starts_with(TABLE_ROW_PREFIX) || line.starts_with(IMAGE_LINK_PREFIX)
}

// ── Heading detection ────────────────────────────────────────────────────────

fn is_heading(line: &str) -> bool {
    let len = line.chars().count();
    if len < MIN_HEADING_CHARS {
        return false;
    }

    if is_upper_case(line) && len < MAX_UPPERCASE_HEADING_CHARS {
        return true;
    }

    if RE_NUMBERED_SECTION.is_match(line) {
        return true;
    }

    len < MAX_SHORT_HEADING_CHARS
        && !line.ends_with(TERMINAL_PUNCTUATION)
        && !is_list_item(line)
        && !is_quote(line)
}

/// At least one cased character and no lower-case ones.
fn is_upper_case(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// Depth from section numbering, else from length.
pub fn heading_level(line: &str) -> u8 {
    if RE_LEVEL_4.is_match(line) {
        return 4;
    }
    if RE_LEVEL_3.is_match(line) {
        return 3;
    }
    if RE_LEVEL_2.is_match(line) {
        return 2;
    }

    match line.chars().count() {
        n if n < 30 => 1,
        n if n < 50 => 2,
        _ => 3,
    }
}

/// Strip a leading section number such as `2.`, `1.1` or `3.2.1.`.
fn clean_heading(line: &str) -> &str {
    match RE_NUMBER_PREFIX.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

// ── Lists and quotes ─────────────────────────────────────────────────────────

fn is_list_item(line: &str) -> bool {
    RE_LIST_ITEM.is_match(line)
}

fn strip_bullet(line: &str) -> &str {
    match RE_LIST_ITEM.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

fn is_quote(line: &str) -> bool {
    line.starts_with(QUOTE_OPENERS)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn render(line: &str) -> String {
        render_line(line, &Settings::default()).unwrap()
    }

    #[test]
    fn test_numbered_subsection_is_level_three() {
        assert_eq!(classify("1.1 Background"), LineKind::Heading(3));
        assert_eq!(render("1.1 Background"), "### Background");
    }

    #[test]
    fn test_numbered_section_is_level_two() {
        assert_eq!(classify("1. Introduction"), LineKind::Heading(2));
        assert_eq!(render("1. Introduction"), "## Introduction");
    }

    #[test]
    fn test_numbered_subsubsection_is_level_four() {
        assert_eq!(render("2.3.1 Error budget"), "#### Error budget");
    }

    #[test]
    fn test_uppercase_heading_level_by_length() {
        let line = "QUARTERLY RESULTS SUMMARY";
        assert_eq!(line.chars().count(), 25);
        assert_eq!(classify(line), LineKind::Heading(1));
        assert_eq!(render(line), "# QUARTERLY RESULTS SUMMARY");
    }

    #[test]
    fn test_long_uppercase_line_is_level_three() {
        let line = "THIS IS A VERY LONG UPPER CASE LINE THAT KEEPS ON GOING AND GOING.";
        assert!(line.chars().count() >= 50);
        assert_eq!(classify(line), LineKind::Heading(3));
    }

    #[test]
    fn test_medium_short_line_is_level_two() {
        let line = "Results of the second field campaign";
        assert!((30..50).contains(&line.chars().count()));
        assert_eq!(classify(line), LineKind::Heading(2));
    }

    #[test]
    fn test_punctuated_long_sentence_is_body() {
        let line = "This sentence is long enough and ends with a period, so it stays as regular paragraph text.";
        assert_eq!(classify(line), LineKind::Body);
        assert_eq!(render(line), line);
    }

    #[test]
    fn test_short_punctuated_line_is_body() {
        assert_eq!(classify("It rained."), LineKind::Body);
        assert_eq!(classify("However,"), LineKind::Body);
    }

    #[test]
    fn test_short_unpunctuated_line_is_heading() {
        // Over-broad on purpose: short lines without terminal punctuation.
        assert_eq!(classify("see the appendix"), LineKind::Heading(1));
    }

    #[test]
    fn test_very_short_lines_are_never_headings() {
        assert_eq!(classify("12"), LineKind::Body);
        assert_eq!(classify("OK"), LineKind::Body);
    }

    #[test]
    fn test_star_bullet_is_normalised() {
        assert_eq!(render("* Item one"), "- Item one");
    }

    #[test]
    fn test_other_bullets_are_normalised() {
        assert_eq!(render("• second point"), "- second point");
        assert_eq!(render("- already markdown"), "- already markdown");
    }

    #[test]
    fn test_long_list_item_is_still_list() {
        let line = "- a bullet that is long enough to run past the eighty character heading threshold for sure.";
        assert_eq!(classify(line), LineKind::ListItem);
    }

    #[test]
    fn test_uppercase_bullet_is_heading() {
        // Upper-case detection outranks the list rule.
        assert_eq!(classify("- NOTE"), LineKind::Heading(1));
    }

    #[test]
    fn test_bullet_without_space_is_not_list() {
        assert_eq!(classify("-5 degrees in winter."), LineKind::Body);
    }

    #[test]
    fn test_quotes() {
        assert_eq!(render("\"To be or not to be\""), "> \"To be or not to be\"");
        assert_eq!(
            render("\u{201C}Stay hungry, stay foolish.\u{201D} he said to the graduating class, smiling."),
            "> \u{201C}Stay hungry, stay foolish.\u{201D} he said to the graduating class, smiling."
        );
    }

    #[test]
    fn test_page_marker_dropped_without_metadata() {
        assert_eq!(render_line("<!-- Page 3 -->", &Settings::default()), None);
    }

    #[test]
    fn test_page_marker_kept_with_metadata() {
        let settings = Settings {
            include_metadata: true,
            ..Settings::default()
        };
        assert_eq!(
            render_line("<!-- Page 3 -->", &settings).as_deref(),
            Some("<!-- Page 3 -->")
        );
    }

    #[test]
    fn test_table_rows_and_image_links_pass_through() {
        assert_eq!(classify("| A | B |"), LineKind::Markup);
        assert_eq!(render("| --- | --- |"), "| --- | --- |");
        assert_eq!(
            render("![Image from page 1](/tmp/page_1_image_1.png)"),
            "![Image from page 1](/tmp/page_1_image_1.png)"
        );
    }

    #[test]
    fn test_blank_line_renders_blank() {
        assert_eq!(render_line("   ", &Settings::default()).as_deref(), Some(""));
    }

    #[test]
    fn test_clean_heading_keeps_unnumbered_text() {
        assert_eq!(clean_heading("Overview"), "Overview");
        assert_eq!(clean_heading("3.2.1. Details"), "Details");
        assert_eq!(clean_heading("2024 ANNUAL REPORT"), "ANNUAL REPORT");
    }

    #[test]
    fn test_render_document_drops_markers_without_blank() {
        let text = "<!-- Page 1 -->\nINTRODUCTION\n\nBody text goes here, and it ends properly.\n<!-- Page 2 -->\n* point";
        let md = render_document(text, &Settings::default());
        assert_eq!(
            md,
            "# INTRODUCTION\n\nBody text goes here, and it ends properly.\n- point"
        );
    }

    mod properties {
        use crate::config::Settings;
        use crate::pipeline::classify::render_document;
        use crate::pipeline::normalize::normalize;
        use proptest::prelude::*;

        /// Page-marked text as the assembler lays it out.
        fn page_marked_text() -> impl Strategy<Value = (String, usize)> {
            prop::collection::vec(
                (
                    1usize..1000,
                    "[ \t]{0,2}",
                    prop::collection::vec("[A-Za-z0-9 .,!?*\"|#=-]{0,50}", 0..6),
                ),
                0..8,
            )
            .prop_map(|pages| {
                let count = pages.len();
                let text = pages
                    .into_iter()
                    .map(|(n, indent, lines)| {
                        format!("\n{indent}<!-- Page {n} -->\n{}\n", lines.join("\n"))
                    })
                    .collect::<String>();
                (text, count)
            })
        }

        proptest! {
            #[test]
            fn prop_no_markers_without_metadata((text, _) in page_marked_text()) {
                let md = render_document(&normalize(&text), &Settings::default());
                prop_assert!(!md.contains("<!-- Page"));
            }

            #[test]
            fn prop_every_marker_kept_with_metadata((text, count) in page_marked_text()) {
                let settings = Settings {
                    include_metadata: true,
                    ..Settings::default()
                };
                let md = render_document(&normalize(&text), &settings);
                prop_assert_eq!(md.matches("<!-- Page").count(), count);
            }
        }
    }
}
