//! Point cloud file formats.

pub mod csv;

pub use csv::{load_csv, read_csv, save_csv, write_csv, CSV_HEADER};
