//! Output rendering for result tables

use console::{measure_text_width, Style};
use ruletablelib::{OutputFormat, ResultTable};

/// Gap between table columns
const COLUMN_GAP: &str = "  ";

/// Render a table in the requested format
pub fn render_table(table: &ResultTable, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_text(table)),
        OutputFormat::Json => render_json(table),
        OutputFormat::Csv => Ok(render_csv(table)),
    }
}

/// Pad a cell to `width`: first column left-aligned, others right-aligned
fn pad(text: &str, width: usize, left: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(measure_text_width(text)));
    if left {
        format!("{}{}", text, fill)
    } else {
        format!("{}{}", fill, text)
    }
}

/// Width of the widest line of a cell
fn cell_width(text: &str) -> usize {
    text.lines().map(measure_text_width).max().unwrap_or(0)
}

/// Render an aligned text table with a bold header and dashed separator.
///
/// Cells holding several lines (rule lists split on `\n`) take up as many
/// physical lines as their tallest cell; the other columns stay blank.
fn render_text(table: &ResultTable) -> String {
    let header_style = Style::new().bold();
    let cells = table.cell_texts();

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| cell_width(&row[i]))
                .chain(std::iter::once(measure_text_width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    if let Some(title) = &table.title {
        output.push_str(&format!("{}\n\n", title));
    }

    let header_line = table
        .headers
        .iter()
        .zip(&widths)
        .enumerate()
        .map(|(i, (header, width))| header_style.apply_to(pad(header, *width, i == 0)).to_string())
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    output.push_str(header_line.trim_end());
    output.push('\n');

    let total_width = widths.iter().sum::<usize>()
        + COLUMN_GAP.len() * widths.len().saturating_sub(1);
    output.push_str(&"-".repeat(total_width));
    output.push('\n');

    for row in &cells {
        let split: Vec<Vec<&str>> = row.iter().map(|cell| cell.lines().collect()).collect();
        let height = split.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for n in 0..height {
            let line = split
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell_lines, width))| {
                    pad(cell_lines.get(n).copied().unwrap_or(""), *width, i == 0)
                })
                .collect::<Vec<_>>()
                .join(COLUMN_GAP);
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }

    output
}

/// Render rows as pretty JSON; titled tables keep their full structure
fn render_json(table: &ResultTable) -> anyhow::Result<String> {
    let json = if table.title.is_some() {
        serde_json::to_string_pretty(table)?
    } else {
        serde_json::to_string_pretty(&table.rows)?
    };
    Ok(format!("{}\n", json))
}

/// Quote a CSV field, doubling embedded quotes
fn csv_field(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Render the table as CSV with a header line
fn render_csv(table: &ResultTable) -> String {
    let mut output = String::new();

    let header = table
        .headers
        .iter()
        .map(|h| csv_field(h))
        .collect::<Vec<_>>()
        .join(",");
    output.push_str(&header);
    output.push('\n');

    for row in table.cell_texts() {
        let line = row
            .iter()
            .map(|cell| csv_field(cell))
            .collect::<Vec<_>>()
            .join(",");
        output.push_str(&line);
        output.push('\n');
    }

    output
}
