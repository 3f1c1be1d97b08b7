use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{data::display_cell, frame::Frame};

pub fn render_frame(frame: &Frame, limit: usize) -> String {
    let rows = frame
        .rows()
        .iter()
        .take(limit)
        .map(|row| row.iter().map(display_cell).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    render_table(frame.headers(), &rows)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
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
    let cells = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let sanitized = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&sanitized));
            format!("{sanitized}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
