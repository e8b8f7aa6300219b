use std::borrow::Cow;
use std::fmt::Write as _;

use crate::model::ColumnPair;

const HEADERS: [&str; 7] = ["#", "name", "type", "format", "width", "indexed", "warning"];

pub fn column_rows(pairs: &[ColumnPair]) -> Vec<Vec<String>> {
    pairs
        .iter()
        .enumerate()
        .map(|(idx, pair)| {
            vec![
                (idx + 1).to_string(),
                pair.name().to_string(),
                pair.target
                    .data_type
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                pair.target.format.clone().unwrap_or_default(),
                pair.target.width.to_string(),
                if pair.target.is_indexed() { "yes" } else { "no" }.to_string(),
                pair.warning.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

pub fn render_columns(pairs: &[ColumnPair]) -> String {
    let headers = HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    render_table(&headers, &column_rows(pairs))
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(sanitize_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &separator_widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", sanitize_cell(value), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
