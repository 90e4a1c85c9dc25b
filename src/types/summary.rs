//! Aggregate types produced by the aggregation engine
//!
//! These are derived values. They are never stored; the engine recomputes
//! them from the transaction list whenever a view needs them.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Number of month buckets in a [`MonthlyBreakdown`]
pub const MONTHS_PER_YEAR: usize = 12;

/// Global income, expense and profit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of all income amounts
    pub income: Decimal,

    /// Sum of all expense amounts
    pub expense: Decimal,

    /// `income - expense`
    pub profit: Decimal,
}

/// Income, expense and profit bucketed by calendar month
///
/// Index 0 is January, index 11 is December. Years are not distinguished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyBreakdown {
    pub income: [Decimal; MONTHS_PER_YEAR],
    pub expense: [Decimal; MONTHS_PER_YEAR],
    pub profit: [Decimal; MONTHS_PER_YEAR],
}

impl MonthlyBreakdown {
    /// Whether any month shows a non-zero profit or loss
    ///
    /// A breakdown without activity has nothing worth charting.
    pub fn has_activity(&self) -> bool {
        self.profit.iter().any(|profit| !profit.is_zero())
    }

    /// Iterate over `(month, income, expense, profit)` rows in calendar order
    pub fn rows(&self) -> impl Iterator<Item = (Month, Decimal, Decimal, Decimal)> + '_ {
        Month::ALL
            .iter()
            .enumerate()
            .map(|(i, month)| (*month, self.income[i], self.expense[i], self.profit[i]))
    }
}

/// Calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; MONTHS_PER_YEAR] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month for a zero-based index, `None` outside 0..=11
    pub fn from_index(index: u32) -> Option<Month> {
        Month::ALL.get(index as usize).copied()
    }

    /// Zero-based index (0 = January)
    pub fn index(&self) -> u32 {
        *self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(Month::January))]
    #[case(5, Some(Month::June))]
    #[case(11, Some(Month::December))]
    #[case(12, None)]
    fn test_month_from_index(#[case] index: u32, #[case] expected: Option<Month>) {
        assert_eq!(Month::from_index(index), expected);
    }

    #[test]
    fn test_month_index_round_trips_through_all() {
        for (i, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.index() as usize, i);
        }
    }

    #[test]
    fn test_has_activity() {
        let mut breakdown = MonthlyBreakdown::default();
        assert!(!breakdown.has_activity());

        breakdown.profit[3] = Decimal::new(-15, 0);
        assert!(breakdown.has_activity());
    }

    #[test]
    fn test_rows_are_in_calendar_order() {
        let mut breakdown = MonthlyBreakdown::default();
        breakdown.income[1] = Decimal::new(50, 0);
        breakdown.profit[1] = Decimal::new(50, 0);

        let rows: Vec<_> = breakdown.rows().collect();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].0, Month::January);
        assert_eq!(
            rows[1],
            (
                Month::February,
                Decimal::new(50, 0),
                Decimal::ZERO,
                Decimal::new(50, 0)
            )
        );
    }
}
