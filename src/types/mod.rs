//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Transaction records, identifiers and edit payloads
//! - `summary`: Aggregated totals and month buckets
//! - `error`: Error types for the bookkeeping engine

pub mod error;
pub mod summary;
pub mod transaction;

pub use error::BookError;
pub use summary::{Month, MonthlyBreakdown, Totals};
pub use transaction::{
    parse_date, NewTransaction, Transaction, TransactionId, TransactionPatch, TransactionType,
    DATE_FORMAT, MAX_AMOUNT, MISSING_DESCRIPTION,
};
