//! Plain-text rendering for terminal output
//!
//! Income amounts are shown with a leading `+`, expenses with `-`. The monthly
//! view draws a horizontal bar per month scaled to the largest absolute
//! profit, `#` for profit and `-` for loss.

use crate::types::{MonthlyBreakdown, Totals, Transaction, TransactionType};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Width of the longest bar in the monthly chart
const BAR_WIDTH: usize = 40;

/// Shown instead of an empty table
pub const EMPTY_TABLE: &str = "No transactions yet.";

/// Shown instead of a chart when every month is zero
pub const EMPTY_CHART: &str = "No monthly activity to chart yet.";

/// Render the transaction table
pub fn transactions_table(transactions: &[&Transaction]) -> String {
    if transactions.is_empty() {
        return format!("{}\n", EMPTY_TABLE);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:<10} {:<8} {:<32} {:>14}",
        "ID", "DATE", "TYPE", "DESCRIPTION", "AMOUNT"
    );
    for tx in transactions {
        let sign = match tx.tx_type {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        };
        let _ = writeln!(
            out,
            "{:<15} {:<10} {:<8} {:<32} {:>14}",
            tx.id,
            tx.date,
            tx.tx_type.as_str(),
            truncate(tx.display_description(), 32),
            format!("{}{:.2}", sign, tx.effective_amount())
        );
    }
    out
}

/// Render the income/expense/profit summary
pub fn totals_table(totals: &Totals) -> String {
    let status = if totals.profit >= Decimal::ZERO {
        "profit"
    } else {
        "loss"
    };
    format!(
        "Income:  {:>14.2}\nExpense: {:>14.2}\nProfit:  {:>14.2} ({})\n",
        totals.income, totals.expense, totals.profit, status
    )
}

/// Render the monthly breakdown as a table with a profit bar per month
pub fn monthly_chart(breakdown: &MonthlyBreakdown) -> String {
    if !breakdown.has_activity() {
        return format!("{}\n", EMPTY_CHART);
    }

    let largest = breakdown
        .profit
        .iter()
        .map(|profit| profit.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>12} {:>12} {:>12}",
        "MONTH", "INCOME", "EXPENSE", "PROFIT"
    );
    for (month, income, expense, profit) in breakdown.rows() {
        let _ = writeln!(
            out,
            "{:<10} {:>12.2} {:>12.2} {:>12.2} {}",
            month.name(),
            income,
            expense,
            profit,
            bar(profit, largest)
        );
    }
    out
}

fn bar(value: Decimal, largest: Decimal) -> String {
    if largest.is_zero() || value.is_zero() {
        return String::new();
    }
    let ratio = (value.abs() / largest).to_f64().unwrap_or(0.0);
    let len = ((ratio * BAR_WIDTH as f64).round() as usize).max(1);
    let glyph = if value > Decimal::ZERO { "#" } else { "-" };
    glyph.repeat(len)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars - 1).collect();
    shortened.push('~');
    shortened
}
