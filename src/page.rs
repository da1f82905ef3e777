//! Page data model: what an extractor hands to the page assembler.

use std::path::PathBuf;

/// One cell of an extracted table; `None` when the extractor found no text.
pub type Cell = Option<String>;

/// One table row, in reading order.
pub type Row = Vec<Cell>;

/// A rectangular (or ragged) grid of optional cell strings.
///
/// The first row is always rendered as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from string cells, treating every cell as present.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maximum row length across the table.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// An extracted image already written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Resolved filesystem path of the PNG.
    pub path: PathBuf,
    /// 1-based page the image came from.
    pub page: usize,
    /// 1-based sequence index within the page.
    pub index: usize,
}

/// Everything one extraction path produced for a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// 1-based page ordinal.
    pub number: usize,
    /// Body text, if the extractor found any.
    pub text: Option<String>,
    /// Tables in extraction order.
    pub tables: Vec<Table>,
    /// Saved images in extraction order.
    pub images: Vec<ImageReference>,
    /// Images encountered but skipped because decoding or saving failed.
    pub skipped_images: usize,
}

impl Page {
    /// A page with body text only.
    pub fn with_text(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Body text, or `None` when absent or whitespace-only.
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_longest_row() {
        let t = Table::new(vec![vec![None], vec![None, None, None], vec![]]);
        assert_eq!(t.width(), 3);
        assert_eq!(Table::default().width(), 0);
    }

    #[test]
    fn empty_means_no_rows() {
        assert!(Table::default().is_empty());
        assert!(!Table::new(vec![vec![]]).is_empty());
    }

    #[test]
    fn from_strings_marks_cells_present() {
        let t = Table::from_strings([["A", "B"], ["1", "2"]]);
        assert_eq!(t.rows[1], vec![Some("1".to_string()), Some("2".to_string())]);
    }

    #[test]
    fn whitespace_body_counts_as_absent() {
        assert_eq!(Page::with_text(1, "  \n\t").body(), None);
        assert_eq!(Page::with_text(1, "hello").body(), Some("hello"));
        assert_eq!(Page::default().body(), None);
    }
}
