//! Console tables and file export

pub mod export;
pub mod table;

pub use export::{export_csv, half_sequence_matrix, write_csv, EXPORT_HEADERS};
pub use table::{render_grid, CoefficientTable, HalfSequenceTable};
