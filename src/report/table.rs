use std::io::{self, Write};

use crate::tuning::result::TuningResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Draws a bordered text table with a `=` rule under the header and a `-`
/// rule between body rows.
///
/// # Panics
/// Panics if a row or `aligns` does not have one entry per header.
pub fn render_grid(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    assert_eq!(aligns.len(), headers.len(), "one alignment per column");
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        assert_eq!(row.len(), headers.len(), "row has the wrong number of cells");
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut table = rule(&widths, '-');
    table.push_str(&line(headers.iter().copied(), &widths, aligns));
    table.push_str(&rule(&widths, '='));
    for row in rows {
        table.push_str(&line(row.iter().map(String::as_str), &widths, aligns));
        table.push_str(&rule(&widths, '-'));
    }
    table
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut out = String::from("+");
    for w in widths {
        out.extend(std::iter::repeat(fill).take(w + 2));
        out.push('+');
    }
    out.push('\n');
    out
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], aligns: &[Align]) -> String {
    let mut out = String::from("|");
    for ((cell, w), align) in cells.zip(widths).zip(aligns) {
        let pad = w - cell.chars().count();
        let (left, right) = match align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
        };
        out.push(' ');
        out.extend(std::iter::repeat(' ').take(left));
        out.push_str(cell);
        out.extend(std::iter::repeat(' ').take(right));
        out.push_str(" |");
    }
    out.push('\n');
    out
}

/// The `n` best rows by mean validation score as a three-column table.
pub fn render_top(results: &TuningResults, n: usize) -> String {
    let rows: Vec<Vec<String>> = results.sorted_by_validation()
        .into_iter()
        .take(n)
        .map(|r| vec![
            r.params.to_string(),
            format!("{:.4}", r.mean_val_score),
            format!("{:.4}", r.mean_train_score),
        ])
        .collect();
    render_grid(
        &["Parameters", "Validation score", "Train score"],
        &[Align::Left, Align::Right, Align::Right],
        &rows,
    )
}

pub fn print_top(results: &TuningResults, n: usize) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(render_top(results, n).as_bytes())?;
    out.flush()
}
