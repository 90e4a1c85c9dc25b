//! CSV format handling for transaction rows and rendered views
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization of imported rows
//! - Conversion from CSV records to creation payloads
//! - Serialization of the transaction table and the monthly breakdown
//!
//! All functions are pure (no file handling) for easy testing.

use crate::core::transaction_store::{validate_amount, validate_description};
use crate::types::{parse_date, BookError, MonthlyBreakdown, NewTransaction, Totals, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the import format with columns: type, amount, description, date
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
}

/// Convert a CsvRecord to a NewTransaction
///
/// This function:
/// - Parses the transaction type (case-insensitive)
/// - Parses the amount into a Decimal and requires it to be positive
/// - Requires a non-empty description
/// - Parses the date
///
/// The same rules apply again when the store creates the record; checking
/// here lets the importer report the offending line.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<NewTransaction, String> {
    let tx_type = csv_record.tx_type.parse()?;

    let amount = Decimal::from_str(csv_record.amount.trim())
        .map_err(|_| format!("Invalid amount '{}'", csv_record.amount))?;
    validate_amount(amount).map_err(|e| e.to_string())?;

    let description = validate_description(&csv_record.description).map_err(|e| e.to_string())?;

    let date = parse_date(&csv_record.date)
        .ok_or_else(|| format!("Invalid date '{}'", csv_record.date))?;

    Ok(NewTransaction::new(tx_type, amount, description, date))
}

/// Write the transaction table in CSV format
///
/// Columns: id, date, type, description, amount. Rows keep the given order.
/// A non-numeric amount is written as an empty field.
pub fn write_transactions_csv<'a, I>(
    transactions: I,
    output: &mut dyn Write,
) -> Result<(), BookError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "date", "type", "description", "amount"])?;

    for tx in transactions {
        writer.write_record(&[
            tx.id.to_string(),
            tx.date.clone(),
            tx.tx_type.to_string(),
            tx.description.clone(),
            tx.amount_text().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the monthly breakdown in CSV format
///
/// Columns: month, income, expense, profit; twelve rows, January first.
pub fn write_monthly_csv(
    breakdown: &MonthlyBreakdown,
    output: &mut dyn Write,
) -> Result<(), BookError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["month", "income", "expense", "profit"])?;

    for (month, income, expense, profit) in breakdown.rows() {
        writer.write_record(&[
            month.to_string(),
            format!("{:.2}", income),
            format!("{:.2}", expense),
            format!("{:.2}", profit),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the totals as a single CSV row
///
/// Columns: income, expense, profit.
pub fn write_totals_csv(totals: &Totals, output: &mut dyn Write) -> Result<(), BookError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["income", "expense", "profit"])?;
    writer.write_record(&[
        format!("{:.2}", totals.income),
        format!("{:.2}", totals.expense),
        format!("{:.2}", totals.profit),
    ])?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn csv_record(tx_type: &str, amount: &str, description: &str, date: &str) -> CsvRecord {
        CsvRecord {
            tx_type: tx_type.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
            date: date.to_string(),
        }
    }

    #[rstest]
    #[case("income", TransactionType::Income)]
    #[case("expense", TransactionType::Expense)]
    #[case("INCOME", TransactionType::Income)] // case insensitive
    fn test_convert_csv_record_valid(
        #[case] tx_type: &str,
        #[case] expected_type: TransactionType,
    ) {
        let record =
            convert_csv_record(csv_record(tx_type, "100.25", "Salary", "2024-01-05")).unwrap();

        assert_eq!(record.tx_type, expected_type);
        assert_eq!(record.amount, Decimal::new(10025, 2));
        assert_eq!(record.description, "Salary");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[rstest]
    #[case::invalid_type("transfer", "10", "x", "2024-01-01", "Invalid transaction type")]
    #[case::invalid_amount("income", "ten", "x", "2024-01-01", "Invalid amount")]
    #[case::zero_amount("income", "0", "x", "2024-01-01", "greater than zero")]
    #[case::negative_amount("expense", "-3", "x", "2024-01-01", "greater than zero")]
    #[case::empty_description("income", "10", "  ", "2024-01-01", "must not be empty")]
    #[case::invalid_date("income", "10", "x", "01/02/2024", "Invalid date")]
    fn test_convert_csv_record_errors(
        #[case] tx_type: &str,
        #[case] amount: &str,
        #[case] description: &str,
        #[case] date: &str,
        #[case] expected_error: &str,
    ) {
        let result = convert_csv_record(csv_record(tx_type, amount, description, date));
        let error = result.unwrap_err();
        assert!(error.contains(expected_error), "unexpected error: {}", error);
    }

    #[test]
    fn test_write_transactions_csv() {
        let transactions = vec![
            Transaction {
                id: 2,
                tx_type: TransactionType::Expense,
                amount: Some(Decimal::new(4000, 2)),
                description: "Groceries, weekly".to_string(),
                date: "2024-01-10".to_string(),
                created_at: None,
                updated_at: None,
            },
            Transaction {
                id: 1,
                tx_type: TransactionType::Income,
                amount: None,
                description: "Broken".to_string(),
                date: "2024-01-05".to_string(),
                created_at: None,
                updated_at: None,
            },
        ];

        let mut output = Vec::new();
        write_transactions_csv(&transactions, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,date,type,description,amount\n\
             2,2024-01-10,expense,\"Groceries, weekly\",40\n\
             1,2024-01-05,income,Broken,\n"
        );
    }

    #[test]
    fn test_write_transactions_csv_empty() {
        let mut output = Vec::new();
        write_transactions_csv(&Vec::<Transaction>::new(), &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,date,type,description,amount\n"
        );
    }

    #[test]
    fn test_write_monthly_csv() {
        let mut breakdown = MonthlyBreakdown::default();
        breakdown.income[0] = Decimal::new(100, 0);
        breakdown.expense[0] = Decimal::new(40, 0);
        breakdown.profit[0] = Decimal::new(60, 0);
        breakdown.expense[11] = Decimal::new(525, 2);
        breakdown.profit[11] = Decimal::new(-525, 2);

        let mut output = Vec::new();
        write_monthly_csv(&breakdown, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "month,income,expense,profit");
        assert_eq!(lines[1], "January,100.00,40.00,60.00");
        assert_eq!(lines[2], "February,0.00,0.00,0.00");
        assert_eq!(lines[12], "December,0.00,5.25,-5.25");
    }

    #[test]
    fn test_write_totals_csv() {
        let totals = Totals {
            income: Decimal::new(150, 0),
            expense: Decimal::new(40, 0),
            profit: Decimal::new(110, 0),
        };

        let mut output = Vec::new();
        write_totals_csv(&totals, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "income,expense,profit\n150.00,40.00,110.00\n");
    }
}
