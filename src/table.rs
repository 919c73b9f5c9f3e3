//! Plain-text tables for the terminal.

use unicode_segmentation::UnicodeSegmentation;

const COLUMN_GAP: &str = "  ";

/// Render `rows` under `headers` with every column padded to its widest cell.
///
/// Width is measured in graphemes so that non-ASCII names line up. Rows
/// shorter than `headers` are padded with empty cells.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| width(header)).collect();

    for row in rows {
        for (column, cell) in row.iter().enumerate().take(headers.len()) {
            widths[column] = widths[column].max(width(cell));
        }
    }

    let rules: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

    let mut output = String::new();
    push_line(&mut output, headers.iter().copied(), &widths);
    push_line(&mut output, rules.iter().map(String::as_str), &widths);

    for row in rows {
        let cells = (0..headers.len()).map(|column| row.get(column).map_or("", String::as_str));
        push_line(&mut output, cells, &widths);
    }

    output
}

fn push_line<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, column_width)| {
            let padding = column_width.saturating_sub(width(cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);

    output.push_str(line.trim_end());
    output.push('\n');
}

fn width(text: &str) -> usize {
    text.graphemes(true).count()
}
