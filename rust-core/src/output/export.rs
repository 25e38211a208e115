//! Spreadsheet-friendly export of a design
//!
//! The half sequence is laid out as an `(n + 1) × 4` matrix with columns
//! index, window, ideal, coefficient, and written as CSV with a header row.

use crate::filters::FilterDesign;
use ndarray::Array2;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Column headers, in matrix column order
pub const EXPORT_HEADERS: [&str; 4] = ["n", "window", "ideal", "coefficient"];

/// Half-sequence matrix: one row per k = 0..=n
pub fn half_sequence_matrix(design: &FilterDesign) -> Array2<f64> {
    let rows = design.half_coefficients.len();
    Array2::from_shape_fn((rows, EXPORT_HEADERS.len()), |(k, col)| match col {
        0 => k as f64,
        1 => design.window[k],
        2 => design.ideal[k],
        _ => design.half_coefficients[k],
    })
}

/// Write the half-sequence matrix as CSV
pub fn write_csv<W: Write>(design: &FilterDesign, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", EXPORT_HEADERS.join(","))?;

    for row in half_sequence_matrix(design).rows() {
        let index = row[0] as usize;
        writeln!(writer, "{},{},{},{}", index, row[1], row[2], row[3])?;
    }

    writer.flush()
}

/// Write the CSV export to `path`, replacing any existing file
pub fn export_csv(design: &FilterDesign, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(design, BufWriter::new(file))?;

    info!(path = %path.display(), rows = design.half_coefficients.len(), "coefficients exported");
    Ok(())
}
