//! Filter and search engine
//!
//! Derives the visible subset of the transaction list. Three independent
//! predicates are combined with AND; each one can be switched off, in which
//! case it lets everything through. Because they are independent the order in
//! which they are applied does not matter, and the result always keeps the
//! relative order of the input.

use crate::types::{Month, Transaction, TransactionType};
use std::fmt;
use std::str::FromStr;

/// Keep all records, or only one type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(tx_type) => tx.tx_type == *tx_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(tx_type) => write!(f, "{}", tx_type),
        }
    }
}

/// Keep all records, or only those dated in one calendar month
///
/// Records with an unparsable date never match a specific month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    /// Filter for a zero-based month index (0 = January)
    pub fn from_index(index: u32) -> Result<Self, String> {
        Month::from_index(index)
            .map(MonthFilter::Only)
            .ok_or_else(|| format!("Invalid month index: {} (expected 0-11)", index))
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(month) => tx.month_index() == Some(month.index()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = String;

    /// Parses `all` or a zero-based month index
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        let index = s
            .parse::<u32>()
            .map_err(|_| format!("Invalid month filter: '{}'", s))?;
        MonthFilter::from_index(index)
    }
}

/// The full set of predicates applied to the transaction list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub type_filter: TypeFilter,
    pub month_filter: MonthFilter,

    /// Case-insensitive substring matched against the description or the
    /// decimal rendering of the amount. Empty matches everything.
    pub search_term: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn with_month(mut self, month_filter: MonthFilter) -> Self {
        self.month_filter = month_filter;
        self
    }

    pub fn with_search(mut self, search_term: impl Into<String>) -> Self {
        self.search_term = search_term.into();
        self
    }

    /// Whether a single record passes every predicate
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.type_filter.matches(tx)
            && self.month_filter.matches(tx)
            && search_matches(&self.search_term.to_lowercase(), tx)
    }
}

/// Records that pass every predicate, in input order
pub fn filter<'a>(records: &'a [Transaction], criteria: &FilterCriteria) -> Vec<&'a Transaction> {
    let term = criteria.search_term.to_lowercase();

    records
        .iter()
        .filter(|tx| criteria.type_filter.matches(tx))
        .filter(|tx| criteria.month_filter.matches(tx))
        .filter(|tx| search_matches(&term, tx))
        .collect()
}

// `term` must already be lowercase.
fn search_matches(term: &str, tx: &Transaction) -> bool {
    if term.is_empty() {
        return true;
    }

    tx.description.to_lowercase().contains(term)
        || tx
            .amount_text()
            .is_some_and(|amount| amount.contains(term))
}
