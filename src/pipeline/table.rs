//! Table transcoding: one grid of optional cells → one GFM pipe table.
//!
//! The transcoder never fails. Ragged rows are right-padded to the widest
//! row, missing cells become empty strings, and a table with nothing to show
//! becomes an empty string so the page assembler can simply skip it.

use crate::page::{Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Render `table` as a Markdown pipe table.
///
/// Row 0 is the header regardless of its content; a separator of `---`
/// cells follows, then the remaining rows in order. Lines are joined with
/// `\n` and there is no trailing newline.
///
/// ```rust
/// use pdfstruct::page::Table;
/// use pdfstruct::pipeline::table::transcode;
///
/// let table = Table::new(vec![
///     vec![Some("A".into()), Some("B".into())],
///     vec![Some("1".into()), None],
/// ]);
/// assert_eq!(transcode(&table), "| A | B |\n| --- | --- |\n| 1 |  |");
/// ```
pub fn transcode(table: &Table) -> String {
    if table.is_empty() {
        return String::new();
    }
    let width = table.width();
    if width == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    for (i, row) in table.rows.iter().enumerate() {
        let mut cells: Vec<String> = row.iter().map(clean_cell).collect();
        cells.resize(width, String::new());
        lines.push(render_row(&cells));

        if i == 0 {
            lines.push(render_row(&vec!["---".to_string(); width]));
        }
    }

    lines.join("\n")
}

/// `None` → `""`; line breaks and whitespace runs → one space; trimmed.
/// Literal pipes are escaped so they cannot split the cell.
fn clean_cell(cell: &Cell) -> String {
    match cell {
        None => String::new(),
        Some(text) => RE_WHITESPACE
            .replace_all(text, " ")
            .trim()
            .replace('|', "\\|"),
    }
}

fn render_row(cells: &[String]) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(cell);
        line.push_str(" |");
    }
    line
}
