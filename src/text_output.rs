//! Plain-text table output
//!
//! Columns are padded to their widest cell; numbers are right-aligned, text
//! left-aligned. Emphasized rows (pooled totals) are set off by a rule.

use crate::table::{Cell, Tabular};

const COLUMN_GAP: &str = "  ";

/// Render a table as aligned text
pub fn to_text(table: &dyn Tabular) -> String {
    let headers = table.headers();
    let rows = table.rows();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Cell::display).collect())
        .collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let total_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);

    let mut out = String::new();
    out.push_str(&table.title());
    out.push('\n');
    for line in table.subtitle() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| pad(h, w, false))
        .collect();
    push_line(&mut out, &header_cells);
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for (index, (cells, text)) in rows.iter().zip(&rendered).enumerate() {
        if table.is_emphasized(index) && index > 0 {
            out.push_str(&"-".repeat(total_width));
            out.push('\n');
        }
        let padded: Vec<String> = cells
            .iter()
            .zip(text)
            .zip(&widths)
            .map(|((cell, s), &w)| pad(s, w, cell.is_numeric()))
            .collect();
        push_line(&mut out, &padded);
    }

    if let Some(note) = table.footnote() {
        out.push('\n');
        out.push_str(&note);
        out.push('\n');
    }

    out
}

fn pad(s: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", s, width = width)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str(cells.join(COLUMN_GAP).trim_end());
    out.push('\n');
}
