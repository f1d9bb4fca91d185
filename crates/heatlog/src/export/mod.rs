//! CSV export of a job and its passes.

pub mod csv;
pub mod file;

pub use csv::{column_separator, generate_csv, COLUMNS};
pub use file::{export_filename, write_export};
