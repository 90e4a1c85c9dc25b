//! I/O module
//!
//! Handles the file formats the bookkeeper reads and writes.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, table and monthly output)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `json_format` - JSON export document and import validation
//! - `render` - Plain-text tables for terminal output

pub mod csv_format;
pub mod json_format;
pub mod render;
pub mod sync_reader;

pub use csv_format::{
    convert_csv_record, write_monthly_csv, write_totals_csv, write_transactions_csv, CsvRecord,
};
pub use json_format::{parse_import, ExportDocument, ExportSummary};
pub use sync_reader::SyncReader;
