//! Aggregation engine
//!
//! Pure functions that derive totals and month buckets from a list of
//! transactions. Nothing here fails and nothing is stored: malformed data
//! degrades instead.
//!
//! - A non-numeric amount contributes zero.
//! - A record whose date cannot be parsed still counts in [`totals`] but is
//!   left out of [`monthly_breakdown`].
//!
//! Amounts are `Decimal`, so sums are exact and the result does not depend on
//! the order of the input. Sums saturate at the `Decimal` range instead of
//! overflowing; amounts that pass validation or loading are bounded by
//! [`MAX_AMOUNT`](crate::types::MAX_AMOUNT), so saturation only shows up for
//! records built in code with larger values.

use crate::types::{MonthlyBreakdown, Totals, Transaction, TransactionType};
use rust_decimal::Decimal;

/// Sum income and expense over all records
pub fn totals(records: &[Transaction]) -> Totals {
    let (income, expense) = records.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), tx| match tx.tx_type {
            TransactionType::Income => (income.saturating_add(tx.effective_amount()), expense),
            TransactionType::Expense => (income, expense.saturating_add(tx.effective_amount())),
        },
    );

    Totals {
        income,
        expense,
        profit: income.saturating_sub(expense),
    }
}

/// Bucket income and expense by calendar month of the record's date
pub fn monthly_breakdown(records: &[Transaction]) -> MonthlyBreakdown {
    let mut breakdown = MonthlyBreakdown::default();

    for tx in records {
        let Some(month) = tx.month_index() else {
            continue;
        };
        let bucket = match tx.tx_type {
            TransactionType::Income => &mut breakdown.income[month as usize],
            TransactionType::Expense => &mut breakdown.expense[month as usize],
        };
        *bucket = bucket.saturating_add(tx.effective_amount());
    }

    for slot in 0..breakdown.profit.len() {
        breakdown.profit[slot] = breakdown.income[slot].saturating_sub(breakdown.expense[slot]);
    }

    breakdown
}
