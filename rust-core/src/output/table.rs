//! Box-drawn console tables
//!
//! Presentation only: values are printed exactly as designed, never
//! re-rounded.

use crate::filters::FilterDesign;
use std::fmt;

/// Render rows under `headers` as a grid, every cell right-aligned
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = |left: &str, fill: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| fill.repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(mid), right)
    };
    let line = |cells: &[&str]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, w)| {
                let cell = cells.get(col).copied().unwrap_or("");
                format!(" {:>width$} ", cell, width = w)
            })
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let mut out = rule("╒", "═", "╤", "╕");
    out.push_str(&line(headers));
    out.push_str(&rule("╞", "═", "╪", "╡"));
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(&rule("├", "─", "┼", "┤"));
        }
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
    }
    out.push_str(&rule("╘", "═", "╧", "╛"));
    out
}

/// (n, value) table of a coefficient sequence, n counting from 1
pub struct CoefficientTable<'a> {
    coefficients: &'a [f64],
}

impl<'a> CoefficientTable<'a> {
    pub fn new(coefficients: &'a [f64]) -> Self {
        Self { coefficients }
    }

    pub fn rows(&self) -> Vec<(usize, f64)> {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, &value)| (i + 1, value))
            .collect()
    }
}

impl fmt::Display for CoefficientTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<String>> = self
            .rows()
            .into_iter()
            .map(|(n, value)| vec![n.to_string(), value.to_string()])
            .collect();
        f.write_str(&render_grid(&["n", "value"], &rows))
    }
}

/// Half-sequence breakdown: k, w[k], h[k], h[k]·w[k]
pub struct HalfSequenceTable<'a> {
    design: &'a FilterDesign,
}

impl<'a> HalfSequenceTable<'a> {
    pub fn new(design: &'a FilterDesign) -> Self {
        Self { design }
    }
}

impl fmt::Display for HalfSequenceTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.design;
        let rows: Vec<Vec<String>> = (0..d.half_coefficients.len())
            .map(|k| {
                vec![
                    k.to_string(),
                    d.window[k].to_string(),
                    d.ideal[k].to_string(),
                    d.half_coefficients[k].to_string(),
                ]
            })
            .collect();
        f.write_str(&render_grid(&["n", "window", "ideal", "coefficient"], &rows))
    }
}
