//! Text normalisation: deterministic cleanup of page-marked extractor text.
//!
//! Extractors leave behind runs of blank lines, ragged spacing and rule
//! lines (`-----`, `=====`) drawn at page boundaries. This pass removes them
//! before classification.
//!
//! ## Rule Order
//!
//! 0. Normalise line endings (CRLF / CR → LF)
//! 1. Collapse every run of blank lines to a single blank line
//! 2. Collapse runs of spaces and tabs to one space
//! 3. Delete lines made only of `-` or only of `=`
//! 4. Trim the whole document
//!
//! The pass is idempotent: running it on its own output changes nothing.
//! Rule 3 is evaluated per line (on the trimmed line) before rule 1 folds
//! blank runs, so deleting a rule line can never leave two blank lines
//! behind.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

static RE_RULE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-+|=+)$").unwrap());

/// Apply all normalisation rules to the concatenated document text.
pub fn normalize(input: &str) -> String {
    let text = normalise_line_endings(input);

    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in text.split('\n') {
        let line = collapse_horizontal_space(line);

        if is_rule_line(&line) {
            continue;
        }

        if line.trim().is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
            continue;
        }

        previous_blank = false;
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}

// ── Rule 0: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Collapse horizontal whitespace ───────────────────────────────────

fn collapse_horizontal_space(line: &str) -> String {
    RE_HORIZONTAL_SPACE.replace_all(line, " ").into_owned()
}

// ── Rule 3: Page-break / rule artefacts ──────────────────────────────────────

fn is_rule_line(line: &str) -> bool {
    RE_RULE_LINE.is_match(line.trim())
}

// ── Tests ────────────────────────────────────────────────────────────────────
