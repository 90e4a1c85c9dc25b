use crate::config::{Config, DEFAULT_DATA_DIR};
use crate::core::{FilterCriteria, MonthFilter, TypeFilter};
use crate::types::{Month, NewTransaction, TransactionId, TransactionPatch, TransactionType};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Track personal income and expenses
#[derive(Parser, Debug)]
#[command(name = "ledgerbook")]
#[command(about = "Track personal income and expenses", long_about = None)]
pub struct CliArgs {
    /// Directory holding the local cache and the remote documents
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = DEFAULT_DATA_DIR,
        global = true,
        help = "Directory for the local cache and remote store"
    )]
    pub data_dir: PathBuf,

    /// Signed-in user; enables the remote store
    #[arg(
        long = "user",
        value_name = "NAME",
        global = true,
        help = "User whose remote store to use"
    )]
    pub user: Option<String>,

    /// Work on the local cache only
    #[arg(long = "offline", global = true, help = "Skip the remote store")]
    pub offline: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Record a new income or expense
    Add(AddArgs),

    /// Change fields of an existing transaction
    Edit(EditArgs),

    /// Remove a transaction
    Delete {
        #[arg(value_name = "ID")]
        id: TransactionId,
    },

    /// Show transactions, optionally filtered
    List(ListArgs),

    /// Show total income, expense and profit
    Summary {
        #[arg(long = "format", value_name = "FORMAT", default_value = "table")]
        format: OutputFormat,
    },

    /// Show income, expense and profit per calendar month
    Monthly {
        #[arg(long = "format", value_name = "FORMAT", default_value = "table")]
        format: OutputFormat,
    },

    /// Write all transactions and the summary to a JSON file
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Replace all transactions with those in an exported JSON file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Add transactions from a CSV file (type,amount,description,date)
    ImportCsv {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    #[arg(long = "type", value_name = "TYPE", help = "income or expense")]
    pub tx_type: TransactionType,

    #[arg(
        long = "amount",
        value_name = "AMOUNT",
        allow_hyphen_values = true,
        help = "Positive amount"
    )]
    pub amount: Decimal,

    #[arg(long = "description", value_name = "TEXT")]
    pub description: String,

    #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Defaults to today")]
    pub date: Option<NaiveDate>,
}

impl AddArgs {
    /// Creation payload, dating the record `today` when no date was given
    pub fn to_new_transaction(&self, today: NaiveDate) -> NewTransaction {
        NewTransaction::new(
            self.tx_type,
            self.amount,
            self.description.clone(),
            self.date.unwrap_or(today),
        )
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EditArgs {
    #[arg(value_name = "ID")]
    pub id: TransactionId,

    #[arg(long = "type", value_name = "TYPE")]
    pub tx_type: Option<TransactionType>,

    #[arg(long = "amount", value_name = "AMOUNT", allow_hyphen_values = true)]
    pub amount: Option<Decimal>,

    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

impl EditArgs {
    pub fn to_patch(&self) -> TransactionPatch {
        TransactionPatch {
            tx_type: self.tx_type,
            amount: self.amount,
            description: self.description.clone(),
            date: self.date,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ListArgs {
    #[arg(
        long = "type",
        value_name = "TYPE",
        default_value = "all",
        help = "all, income or expense"
    )]
    pub type_filter: TypeFilter,

    #[arg(
        long = "month",
        value_name = "MONTH",
        value_parser = clap::value_parser!(u32).range(1..=12),
        help = "Calendar month, 1 (January) to 12 (December)"
    )]
    pub month: Option<u32>,

    #[arg(long = "search", value_name = "TEXT", help = "Match description or amount")]
    pub search: Option<String>,

    #[arg(long = "format", value_name = "FORMAT", default_value = "table")]
    pub format: OutputFormat,
}

impl ListArgs {
    /// Filter criteria; the one-based month becomes the zero-based index
    pub fn to_criteria(&self) -> FilterCriteria {
        let month_filter = self
            .month
            .and_then(|month| month.checked_sub(1))
            .and_then(Month::from_index)
            .map_or(MonthFilter::All, MonthFilter::Only);

        FilterCriteria::new()
            .with_type(self.type_filter)
            .with_month(month_filter)
            .with_search(self.search.clone().unwrap_or_default())
    }
}

/// How views are written to stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl CliArgs {
    /// Create a Config from CLI arguments
    pub fn to_config(&self) -> Config {
        Config {
            data_dir: self.data_dir.clone(),
            user: self.user.clone(),
            offline: self.offline,
        }
    }
}
