//! Ledgerbook Library
//! # Overview
//!
//! This library implements a personal bookkeeping tool: a list of income and
//! expense records, the totals and monthly profit derived from it, and a
//! filtered view of the list.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, Totals, MonthlyBreakdown, BookError)
//! - [`core`] - Pure business logic:
//!   - [`core::transaction_store`] - Validated create/update/delete over the record list
//!   - [`core::aggregation`] - Totals and per-month income, expense and profit
//!   - [`core::filter`] - Type, month and text filtering
//! - [`persistence`] - Remote store, local cache and the [`Session`] tying them
//!   to the in-memory store
//! - [`io`] - CSV and JSON formats and terminal rendering
//! - [`cli`] - Argument parsing and command execution
//! - [`config`] / [`logging`] - Runtime configuration and tracing setup
//!
//! # Derived values
//!
//! - `income`: sum of income amounts
//! - `expense`: sum of expense amounts
//! - `profit`: `income - expense`, computed the same way overall and per month
//!
//! Totals and the monthly breakdown are never stored; they are recomputed from
//! the current list whenever they are needed.
//!
//! # Persistence
//!
//! Changes go to the user's remote store first and only then to memory. When
//! the remote store is unavailable the session falls back to a local snapshot
//! and says so through [`LoadOutcome::Degraded`].

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod persistence;
pub mod types;

pub use config::Config;
pub use core::{filter, monthly_breakdown, totals, FilterCriteria, TransactionStore};
pub use persistence::{LoadOutcome, LocalCache, RemoteStore, Session};
pub use types::{
    BookError, MonthlyBreakdown, NewTransaction, Totals, Transaction, TransactionId,
    TransactionPatch, TransactionType,
};
