//! Core business logic module
//!
//! This module contains the in-memory bookkeeping components:
//! - `transaction_store` - Ordered transaction collection with CRUD by id
//! - `id_generator` - Time-derived unique transaction ids
//! - `aggregation` - Totals and month buckets
//! - `filter` - Type, month and free-text filtering

pub mod aggregation;
pub mod filter;
pub mod id_generator;
pub mod transaction_store;

pub use aggregation::{monthly_breakdown, totals};
pub use filter::{filter, FilterCriteria, MonthFilter, TypeFilter};
pub use transaction_store::TransactionStore;
