//! JSON export and import documents
//!
//! An export is a portable snapshot of the whole store:
//!
//! ```json
//! {
//!   "transactions": [ { "id": 1704450000000, "type": "income", ... } ],
//!   "summary": { "totalIncome": "150", "totalExpense": "40", "totalProfit": "110" },
//!   "exportDate": "2024-03-01T10:00:00Z"
//! }
//! ```
//!
//! Import accepts the same document (`records` is accepted in place of
//! `transactions`), validates its structure and returns the records. Any
//! problem is an `ImportFormat` error; nothing is partially applied.

use crate::core::aggregation::totals;
use crate::core::transaction_store::first_duplicate_id;
use crate::types::{BookError, Totals, Transaction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Snapshot of the totals at export time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_profit: Decimal,
}

impl From<Totals> for ExportSummary {
    fn from(totals: Totals) -> Self {
        ExportSummary {
            total_income: totals.income,
            total_expense: totals.expense,
            total_profit: totals.profit,
        }
    }
}

/// The exported document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub transactions: Vec<Transaction>,
    pub summary: ExportSummary,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    /// Build a snapshot of the given records, stamped with `export_date`
    pub fn new(transactions: &[Transaction], export_date: DateTime<Utc>) -> Self {
        ExportDocument {
            transactions: transactions.to_vec(),
            summary: totals(transactions).into(),
            export_date,
        }
    }

    /// Pretty-printed JSON text of the document
    ///
    /// # Errors
    ///
    /// `BookError::Persistence` if serialization fails, the same mapping as
    /// every other JSON failure in the crate.
    pub fn to_json(&self) -> Result<String, BookError> {
        pretty_json(self, "export")
    }
}

fn pretty_json<T: Serialize + ?Sized>(value: &T, context: &str) -> Result<String, BookError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        BookError::persistence(format!("failed to serialize {}: {}", context, e))
    })
}

/// Validate an import document and extract its transactions
///
/// # Errors
///
/// Returns `BookError::ImportFormat` if:
/// - the text is not JSON or not a JSON object
/// - there is no `transactions` (or `records`) array
/// - an element is not transaction-shaped (id and type are required)
/// - two elements share an id
pub fn parse_import(text: &str) -> Result<Vec<Transaction>, BookError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| BookError::import_format(format!("not valid JSON: {}", e)))?;

    let Value::Object(mut fields) = document else {
        return Err(BookError::import_format("document must be a JSON object"));
    };

    let entries = match fields.remove("transactions").or_else(|| fields.remove("records")) {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(BookError::import_format("'transactions' must be an array")),
        None => return Err(BookError::import_format("missing 'transactions' array")),
    };

    let transactions = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Transaction>(entry).map_err(|e| {
                BookError::import_format(format!("transaction #{} is invalid: {}", index + 1, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(id) = first_duplicate_id(&transactions) {
        return Err(BookError::import_format(format!(
            "transaction id {} appears more than once",
            id
        )));
    }

    Ok(transactions)
}
