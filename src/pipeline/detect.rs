//! Table detection from positioned text (stream mode).
//!
//! PDFs rarely carry table structure. What the layout path does get is a set
//! of text fragments with bounding boxes, so tables are recovered from
//! alignment alone: fragments are grouped into rows by vertical position,
//! column edges are found where left edges line up across rows, and runs of
//! consecutive multi-fragment rows that agree with those edges become tables.
//!
//! Coordinates are PDF user space: the origin is bottom-left and `top` is
//! greater than `bottom`.

use crate::page::{Cell, Table};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Horizontal bucket width used to match left edges, in points.
const EDGE_BUCKET: f32 = 5.0;
/// A fragment within this distance of a column edge is aligned with it.
const ALIGN_TOLERANCE: f32 = 5.0;
/// Slack allowed for fragments starting slightly left of their column.
const COLUMN_SLACK: f32 = 10.0;

/// One run of text with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            left,
            right,
            top,
            bottom,
        }
    }

    fn height(&self) -> f32 {
        (self.top - self.bottom).abs().max(1.0)
    }
}

/// Detector thresholds.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Fewer consecutive rows than this is not a table.
    pub min_rows: usize,
    /// Fewer columns than this is not a table.
    pub min_columns: usize,
    /// More columns than this is word-level splitting, not a table.
    pub max_columns: usize,
    /// Row grouping tolerance as a fraction of fragment height.
    pub y_tolerance_factor: f32,
    /// Share of rows (or fragments in a row) that must align with the edges.
    pub min_alignment_ratio: f32,
    /// Edges closer than this, in points, are merged.
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Fragments sharing one baseline, left to right.
#[derive(Debug, Clone)]
struct FragmentRow {
    fragments: Vec<TextFragment>,
}

impl FragmentRow {
    fn is_multi(&self) -> bool {
        self.fragments.len() >= 2
    }

    fn right(&self) -> f32 {
        self.fragments
            .iter()
            .map(|f| f.right)
            .fold(f32::MIN, f32::max)
    }
}

/// Stream-mode table detector.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Find every table on one page, top to bottom.
    pub fn detect(&self, fragments: &[TextFragment]) -> Vec<Table> {
        let fragments: Vec<TextFragment> = fragments
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .cloned()
            .collect();

        if fragments.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(fragments);
        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Columns are re-derived per region so two tables on one page
            // need not share a grid.
            let region_columns = self.detect_columns(region);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                debug!(
                    "Skipping region: too many columns ({} > {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if is_list_pattern(region, region_columns.len()) {
                debug!("Skipping region: list markers, not a table");
                continue;
            }

            tables.push(build_table(region, &region_columns));
        }

        debug!("Detected {} table(s)", tables.len());
        tables
    }

    fn group_into_rows(&self, mut fragments: Vec<TextFragment>) -> Vec<FragmentRow> {
        fragments.sort_by(|a, b| {
            b.top
                .total_cmp(&a.top)
                .then_with(|| a.left.total_cmp(&b.left))
        });

        let mut rows: Vec<FragmentRow> = Vec::new();
        let mut current: Vec<TextFragment> = Vec::new();
        let mut current_top: Option<f32> = None;

        for fragment in fragments {
            let tolerance = fragment.height() * self.config.y_tolerance_factor;
            match current_top {
                Some(top) if (fragment.top - top).abs() <= tolerance => current.push(fragment),
                _ => {
                    if !current.is_empty() {
                        rows.push(finish_row(std::mem::take(&mut current)));
                    }
                    current_top = Some(fragment.top);
                    current.push(fragment);
                }
            }
        }
        if !current.is_empty() {
            rows.push(finish_row(current));
        }

        rows
    }

    /// Left edges shared by enough multi-fragment rows, merged and sorted.
    fn detect_columns(&self, rows: &[FragmentRow]) -> Vec<f32> {
        let multi: Vec<&FragmentRow> = rows.iter().filter(|r| r.is_multi()).collect();
        if multi.len() < self.config.min_rows {
            return vec![];
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi {
            let buckets: HashSet<i32> = row
                .fragments
                .iter()
                .map(|f| (f.left / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((multi.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::with_capacity(edges.len());
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Runs of consecutive aligned multi-fragment rows, as inclusive ranges.
    fn find_regions(&self, rows: &[FragmentRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned =
                row.is_multi() && alignment_score(row, columns) >= self.config.min_alignment_ratio;
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }
}

fn finish_row(mut fragments: Vec<TextFragment>) -> FragmentRow {
    fragments.sort_by(|a, b| a.left.total_cmp(&b.left));
    FragmentRow { fragments }
}

/// Fraction of the row's fragments that start on a column edge.
fn alignment_score(row: &FragmentRow, columns: &[f32]) -> f32 {
    if row.fragments.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .fragments
        .iter()
        .filter(|f| columns.iter().any(|c| (f.left - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.fragments.len() as f32
}

fn build_table(rows: &[FragmentRow], columns: &[f32]) -> Table {
    let right = rows.iter().map(FragmentRow::right).fold(f32::MIN, f32::max);

    let grid = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for fragment in &row.fragments {
                let col = column_for(fragment.left, columns, right);
                cells[col].push(fragment.text.trim());
            }
            cells
                .into_iter()
                .map(|parts| -> Cell {
                    if parts.is_empty() {
                        None
                    } else {
                        Some(parts.join(" "))
                    }
                })
                .collect()
        })
        .collect();

    Table::new(grid)
}

/// Column whose span contains `x`, else the nearest edge.
fn column_for(x: f32, columns: &[f32], right: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right + 100.0);
        if x >= start - COLUMN_SLACK && x < end - COLUMN_SLACK {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (x - **a).abs().total_cmp(&(x - **b).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

// ── List guard ───────────────────────────────────────────────────────────────

/// Bulleted or numbered lists split marker and text into separate
/// fragments, which looks like a two-column table.
fn is_list_pattern(rows: &[FragmentRow], column_count: usize) -> bool {
    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        if let Some(first) = row.fragments.first() {
            let text = first.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let n = rows.len() as f32;
    if bullets as f32 / n >= 0.5 {
        return true;
    }
    column_count == 2 && (bullets + numbers) as f32 / n >= 0.5
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text,
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "►" | "■" | "●"
    )
}

/// `1.`, `12)`, `a.`, or a bare number.
fn is_number_marker(text: &str) -> bool {
    let Some(last) = text.chars().last() else {
        return false;
    };
    let stem = if last == '.' || last == ')' {
        &text[..text.len() - 1]
    } else {
        text
    };

    if !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    stem != text && stem.chars().count() == 1 && stem.chars().all(char::is_alphabetic)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Fragment of height 10 whose box starts at (`x`, `top` - 10).
    fn frag(text: &str, x: f32, top: f32) -> TextFragment {
        TextFragment::new(text, x, top - 10.0, x + text.len() as f32 * 6.0, top)
    }

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    #[test]
    fn test_simple_grid() {
        let fragments = vec![
            frag("Name", 50.0, 700.0),
            frag("Qty", 150.0, 700.0),
            frag("Price", 250.0, 700.0),
            frag("Apple", 50.0, 685.0),
            frag("3", 150.0, 685.0),
            frag("1.20", 250.0, 685.0),
            frag("Pear", 50.0, 670.0),
            frag("5", 150.0, 670.0),
            frag("0.90", 250.0, 670.0),
        ];
        let tables = TableDetector::new().detect(&fragments);
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0],
            Table::from_strings([
                ["Name", "Qty", "Price"],
                ["Apple", "3", "1.20"],
                ["Pear", "5", "0.90"],
            ])
        );
    }

    #[test]
    fn test_rows_are_top_to_bottom_regardless_of_input_order() {
        let fragments = vec![
            frag("b2", 150.0, 685.0),
            frag("a1", 50.0, 700.0),
            frag("a2", 50.0, 685.0),
            frag("b1", 150.0, 700.0),
        ];
        let tables = TableDetector::new().detect(&fragments);
        assert_eq!(tables, vec![Table::from_strings([["a1", "b1"], ["a2", "b2"]])]);
    }

    #[test]
    fn test_config_raises_minimum_rows() {
        let fragments = vec![
            frag("a1", 50.0, 700.0),
            frag("b1", 150.0, 700.0),
            frag("a2", 50.0, 685.0),
            frag("b2", 150.0, 685.0),
        ];
        let strict = TableDetector::with_config(TableDetectorConfig {
            min_rows: 3,
            ..TableDetectorConfig::default()
        });
        assert!(strict.detect(&fragments).is_empty());
        assert_eq!(TableDetector::new().detect(&fragments).len(), 1);
    }

    #[test]
    fn test_missing_cell_is_none() {
        let fragments = vec![
            frag("A", 50.0, 700.0),
            frag("B", 150.0, 700.0),
            frag("C", 250.0, 700.0),
            frag("1", 50.0, 685.0),
            frag("3", 250.0, 685.0),
            frag("4", 50.0, 670.0),
            frag("5", 150.0, 670.0),
            frag("6", 250.0, 670.0),
        ];
        let tables = TableDetector::new().detect(&fragments);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[1], vec![cell("1"), None, cell("3")]);
    }

    #[test]
    fn test_paragraph_text_is_not_a_table() {
        let fragments = vec![
            frag("The quick brown fox jumps over the lazy dog.", 50.0, 700.0),
            frag("It was a bright cold day in April, and the", 50.0, 685.0),
            frag("clocks were striking thirteen.", 50.0, 670.0),
        ];
        assert!(TableDetector::new().detect(&fragments).is_empty());
    }

    #[test]
    fn test_bulleted_list_is_not_a_table() {
        let fragments = vec![
            frag("•", 50.0, 700.0),
            frag("first point", 70.0, 700.0),
            frag("•", 50.0, 685.0),
            frag("second point", 70.0, 685.0),
            frag("•", 50.0, 670.0),
            frag("third point", 70.0, 670.0),
        ];
        assert!(TableDetector::new().detect(&fragments).is_empty());
    }

    #[test]
    fn test_numbered_two_column_list_is_not_a_table() {
        let fragments = vec![
            frag("1.", 50.0, 700.0),
            frag("Install the toolchain", 80.0, 700.0),
            frag("2.", 50.0, 685.0),
            frag("Run the tests", 80.0, 685.0),
        ];
        assert!(TableDetector::new().detect(&fragments).is_empty());
    }

    #[test]
    fn test_tables_separated_by_paragraph() {
        let fragments = vec![
            frag("k1", 50.0, 700.0),
            frag("v1", 150.0, 700.0),
            frag("k2", 50.0, 685.0),
            frag("v2", 150.0, 685.0),
            frag("A full-width paragraph line between the tables", 50.0, 660.0),
            frag("x1", 50.0, 640.0),
            frag("y1", 150.0, 640.0),
            frag("x2", 50.0, 625.0),
            frag("y2", 150.0, 625.0),
        ];
        let tables = TableDetector::new().detect(&fragments);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows[0], vec![cell("k1"), cell("v1")]);
        assert_eq!(tables[1].rows[1], vec![cell("x2"), cell("y2")]);
    }

    #[test]
    fn test_single_row_is_not_a_table() {
        let fragments = vec![frag("A", 50.0, 700.0), frag("B", 150.0, 700.0)];
        assert!(TableDetector::new().detect(&fragments).is_empty());
    }

    #[test]
    fn test_blank_fragments_are_ignored() {
        let fragments = vec![frag("  ", 50.0, 700.0), frag("", 150.0, 700.0)];
        assert!(TableDetector::new().detect(&fragments).is_empty());
    }

    #[test]
    fn test_number_markers() {
        assert!(is_number_marker("1."));
        assert!(is_number_marker("12)"));
        assert!(is_number_marker("7"));
        assert!(is_number_marker("a."));
        assert!(!is_number_marker("1.20"));
        assert!(!is_number_marker("Apple"));
        assert!(!is_number_marker(""));
    }
}
