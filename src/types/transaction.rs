//! Transaction-related types for the bookkeeping engine
//!
//! This module defines the transaction record as it is stored and exchanged
//! with persistence backends, plus the payloads used to create and edit
//! records through the store.
//!
//! Stored records are deliberately tolerant: documents written by older
//! versions or edited by hand may carry a missing or non-numeric amount, a
//! missing description or a date that does not parse. Such records still load;
//! the aggregation and filter engines decide how to treat the bad fields.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction identifier
///
/// Assigned by the store from the wall clock in milliseconds.
pub type TransactionId = i64;

/// Date format used for newly written records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder rendered for a stored record without a description
pub const MISSING_DESCRIPTION: &str = "(no description)";

/// Largest accepted amount magnitude: one quadrillion (10^15)
///
/// New records above it are rejected. Stored records above it load as
/// non-numeric. With every amount at most this large, sums over any list
/// that fits in memory stay far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Kind of money movement a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received
    Income,

    /// Money spent
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Invalid transaction type: '{}'", other)),
        }
    }
}

/// A stored income or expense record
///
/// Field names follow the persisted JSON document (`type`, `createdAt`,
/// `updatedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, immutable once assigned
    pub id: TransactionId,

    /// Income or expense
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    /// Transaction amount
    ///
    /// `None` when the stored value is missing or not a number. Such a record
    /// counts as zero in every aggregate.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Decimal>,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Calendar date as stored, normally `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    /// When the record was created (informational)
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last edited (informational)
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Amount used by aggregation: non-numeric amounts count as zero
    pub fn effective_amount(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// Decimal rendering of the amount, without trailing zeros
    ///
    /// `50.00` renders as `50` and `100.50` as `100.5`. Returns `None` for a
    /// non-numeric amount.
    pub fn amount_text(&self) -> Option<String> {
        self.amount.map(|amount| amount.normalize().to_string())
    }

    /// The stored date, if it can be parsed
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Zero-based month of the stored date (0 = January)
    pub fn month_index(&self) -> Option<u32> {
        self.parsed_date().map(|date| date.month0())
    }

    /// Description for display, with a placeholder when empty
    pub fn display_description(&self) -> &str {
        if self.description.trim().is_empty() {
            MISSING_DESCRIPTION
        } else {
            &self.description
        }
    }
}

/// Fields supplied by the caller when creating a transaction
///
/// The store validates these and assigns the id and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub tx_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn new(
        tx_type: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        NewTransaction {
            tx_type,
            amount,
            description: description.into(),
            date,
        }
    }
}

/// Partial update of a stored transaction
///
/// Every `Some` field replaces the stored value; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub tx_type: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.tx_type.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

/// Parse a stored date
///
/// Understands `YYYY-MM-DD`, RFC 3339 timestamps and naive
/// `YYYY-MM-DDTHH:MM[:SS]` timestamps. Anything else yields `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Accept a JSON number, a numeric string or anything else (as non-numeric)
///
/// Amounts beyond [`MAX_AMOUNT`] are treated as non-numeric.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    let text = match value {
        serde_json::Value::Number(number) => number.to_string(),
        serde_json::Value::String(text) => text,
        _ => return Ok(None),
    };
    let text = text.trim();

    Ok(Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .filter(|amount| amount.abs() <= MAX_AMOUNT))
}

/// Accept an RFC 3339 timestamp; drop anything unreadable
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        _ => return Ok(None),
    };

    Ok(DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(amount: Option<Decimal>, description: &str, date: &str) -> Transaction {
        Transaction {
            id: 1,
            tx_type: TransactionType::Income,
            amount,
            description: description.to_string(),
            date: date.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[rstest]
    #[case("income", TransactionType::Income)]
    #[case("EXPENSE", TransactionType::Expense)]
    #[case("  Income ", TransactionType::Income)]
    fn test_transaction_type_from_str(#[case] input: &str, #[case] expected: TransactionType) {
        assert_eq!(input.parse::<TransactionType>().unwrap(), expected);
    }

    #[test]
    fn test_transaction_type_from_str_rejects_unknown() {
        let result = "transfer".parse::<TransactionType>();
        assert!(result.unwrap_err().contains("Invalid transaction type"));
    }

    #[rstest]
    #[case::plain_date("2024-01-05", Some((2024, 1, 5)))]
    #[case::rfc3339("2024-03-10T12:30:00Z", Some((2024, 3, 10)))]
    #[case::rfc3339_millis("2024-12-31T23:59:59.123+00:00", Some((2024, 12, 31)))]
    #[case::naive_timestamp("2024-07-04T08:15", Some((2024, 7, 4)))]
    #[case::padded(" 2024-02-29 ", Some((2024, 2, 29)))]
    #[case::invalid_day("2023-02-29", None)]
    #[case::garbage("not a date", None)]
    #[case::empty("", None)]
    fn test_parse_date(#[case] input: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(parse_date(input), expected);
    }

    #[rstest]
    #[case("2024-01-05", Some(0))]
    #[case("2024-12-01", Some(11))]
    #[case("31/12/2024", None)]
    fn test_month_index(#[case] date: &str, #[case] expected: Option<u32>) {
        assert_eq!(record(None, "x", date).month_index(), expected);
    }

    #[rstest]
    #[case(Some(Decimal::new(5000, 2)), Some("50"))]
    #[case(Some(Decimal::new(10050, 2)), Some("100.5"))]
    #[case(Some(Decimal::new(1234, 4)), Some("0.1234"))]
    #[case(None, None)]
    fn test_amount_text(#[case] amount: Option<Decimal>, #[case] expected: Option<&str>) {
        assert_eq!(
            record(amount, "x", "2024-01-01").amount_text().as_deref(),
            expected
        );
    }

    #[test]
    fn test_effective_amount_treats_non_numeric_as_zero() {
        assert_eq!(record(None, "x", "").effective_amount(), Decimal::ZERO);
        assert_eq!(
            record(Some(Decimal::new(25, 0)), "x", "").effective_amount(),
            Decimal::new(25, 0)
        );
    }

    #[rstest]
    #[case("Rent", "Rent")]
    #[case("", MISSING_DESCRIPTION)]
    #[case("   ", MISSING_DESCRIPTION)]
    fn test_display_description(#[case] stored: &str, #[case] expected: &str) {
        assert_eq!(record(None, stored, "").display_description(), expected);
    }

    #[rstest]
    #[case::number(r#"100.5"#, Some(Decimal::new(1005, 1)))]
    #[case::integer(r#"40"#, Some(Decimal::new(40, 0)))]
    #[case::numeric_string(r#""75.25""#, Some(Decimal::new(7525, 2)))]
    #[case::scientific(r#""1e3""#, Some(Decimal::new(1000, 0)))]
    #[case::text(r#""abc""#, None)]
    #[case::null(r#"null"#, None)]
    #[case::boolean(r#"true"#, None)]
    #[case::at_limit(r#""1000000000000000""#, Some(MAX_AMOUNT))]
    #[case::negative_at_limit(r#""-1000000000000000""#, Some(-MAX_AMOUNT))]
    #[case::above_limit(r#""1000000000000000.01""#, None)]
    #[case::huge_number(r#"5e28"#, None)]
    #[case::decimal_max(r#""79228162514264337593543950335""#, None)]
    fn test_deserialize_lenient_amount(#[case] amount: &str, #[case] expected: Option<Decimal>) {
        let json = format!(
            r#"{{"id": 7, "type": "expense", "amount": {}, "date": "2024-01-01"}}"#,
            amount
        );
        let tx: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx.amount, expected);
    }

    #[test]
    fn test_max_amount_is_one_quadrillion() {
        assert_eq!(MAX_AMOUNT, Decimal::new(1_000_000_000_000_000, 0));
    }

    #[test]
    fn test_deserialize_tolerates_missing_optional_fields() {
        let tx: Transaction = serde_json::from_str(r#"{"id": 3, "type": "income"}"#).unwrap();
        assert_eq!(tx.id, 3);
        assert_eq!(tx.amount, None);
        assert_eq!(tx.description, "");
        assert_eq!(tx.date, "");
        assert_eq!(tx.created_at, None);
    }

    #[test]
    fn test_deserialize_reads_stored_document_shape() {
        let json = r#"{
            "id": 1704450000000,
            "type": "income",
            "amount": 100,
            "description": "Salary",
            "date": "2024-01-05",
            "createdAt": "2024-01-05T10:20:00.000Z",
            "updatedAt": "garbage"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 1_704_450_000_000);
        assert_eq!(tx.tx_type, TransactionType::Income);
        assert_eq!(tx.amount, Some(Decimal::new(100, 0)));
        assert!(tx.created_at.is_some());
        assert_eq!(tx.updated_at, None);
    }

    #[test]
    fn test_deserialize_requires_id_and_type() {
        assert!(serde_json::from_str::<Transaction>(r#"{"type": "income"}"#).is_err());
        assert!(serde_json::from_str::<Transaction>(r#"{"id": 1}"#).is_err());
        assert!(serde_json::from_str::<Transaction>(r#"{"id": 1, "type": "gift"}"#).is_err());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TransactionPatch::default().is_empty());
        let patch = TransactionPatch {
            description: Some("Groceries".to_string()),
            ..TransactionPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
