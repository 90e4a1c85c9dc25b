//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over transaction rows from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! ```no_run
//! use ledgerbook::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("statement.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Importing: {:?}", record),
//!         Err(e) => eprintln!("Skipped: {}", e),
//!     }
//! }
//! ```
//!
//! # Line Numbers
//!
//! Errors name the file line the offending row starts on, taken from the csv
//! reader's position. The header is line 1, and a quoted description that
//! spans several lines moves every later row down accordingly.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Individual row errors are yielded as Err variants carrying the line number

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{BookError, NewTransaction};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader over `type,amount,description,date` rows
///
/// Rows are read one at a time; only the header and the current row are held
/// in memory.
///
/// # Examples
///
/// ```no_run
/// use ledgerbook::io::sync_reader::SyncReader;
/// use std::path::Path;
///
/// let reader = SyncReader::new(Path::new("statement.csv")).unwrap();
/// let rows: Vec<_> = reader.filter_map(Result::ok).collect();
/// println!("{} rows ready to import", rows.len());
/// ```
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    rows_read: u64,
}

impl SyncReader {
    /// Open a CSV file for streaming iteration
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (for a missing trailing description)
    ///
    /// The header row is read here, so columns are matched by name and may
    /// come in any order.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` positioned on the first data row
    /// * `Err(BookError::Io)` if the file could not be opened
    /// * `Err(BookError::Csv)` if the header row could not be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledgerbook::io::sync_reader::SyncReader;
    /// use std::path::Path;
    ///
    /// match SyncReader::new(Path::new("statement.csv")) {
    ///     Ok(_) => println!("File opened successfully"),
    ///     Err(e) => eprintln!("Failed to open file: {}", e),
    /// }
    /// ```
    pub fn new(path: &Path) -> Result<Self, BookError> {
        let file = File::open(path).map_err(|e| BookError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            rows_read: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<NewTransaction, String>;

    /// Read and convert the next row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(NewTransaction))` for a row that parsed and validated
    /// * `Some(Err(message))` for a bad row, the message starting with
    ///   `Line N:` where N is the file line the row starts on
    /// * `None` at the end of the file
    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        let read = self.reader.read_record(&mut record);
        self.rows_read += 1;
        // Header is line 1; only used if the reader reports no position
        let fallback_line = self.rows_read + 1;

        let record = match read {
            Ok(true) => record,
            Ok(false) => return None,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |pos| pos.line());
                return Some(Err(format!("Line {}: CSV parse error: {}", line, e)));
            }
        };
        let line = record.position().map_or(fallback_line, |pos| pos.line());

        Some(match record.deserialize::<CsvRecord>(Some(&self.headers)) {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
