//! Bookkeeping session
//!
//! A `Session` owns the in-memory store and the two persistence layers, and is
//! the single entry point the command line (or any other front end) talks to.
//! It is passed around explicitly; there is no global instance.
//!
//! # Write policy
//!
//! With a remote store, every change is sent to the remote first. Memory only
//! changes once the remote has accepted it, so a failed call leaves the
//! session exactly as it was. The local cache is then refreshed on a best
//! effort basis.
//!
//! Without a remote store, memory changes first and the local cache is
//! written immediately; a failed cache write is reported to the caller.
//!
//! A cache file that exists but could not be read is never overwritten. Until
//! a later load succeeds, local writes fail with `Persistence` and the refresh
//! after a remote write is skipped.

use crate::core::{self, FilterCriteria, TransactionStore};
use crate::io::{ExportDocument, SyncReader};
use crate::persistence::{LocalCache, RemoteStore};
use crate::types::{
    BookError, MonthlyBreakdown, NewTransaction, Totals, Transaction, TransactionId,
    TransactionPatch,
};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;
use tokio::sync::oneshot;

/// Where the data in memory came from after a degraded load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The local snapshot on this machine
    LocalCache,

    /// Nothing could be read; whatever was already in memory is kept
    Memory,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::LocalCache => f.write_str("local cache"),
            DataSource::Memory => f.write_str("in-memory data"),
        }
    }
}

/// Result of [`Session::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Served from the authoritative remote store
    Persisted { backend: String, records: usize },

    /// The remote store was absent or failed; served from a fallback
    Degraded {
        reason: String,
        source: DataSource,
        records: usize,
    },
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadOutcome::Degraded { .. })
    }

    /// Number of records in memory after the load
    pub fn records(&self) -> usize {
        match self {
            LoadOutcome::Persisted { records, .. } | LoadOutcome::Degraded { records, .. } => {
                *records
            }
        }
    }
}

/// Outcome of a CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvImportReport {
    /// Ids of the created transactions, in file order
    pub imported: Vec<TransactionId>,

    /// One message per skipped row
    pub skipped: Vec<String>,
}

pub struct Session {
    store: TransactionStore,
    remote: Option<Box<dyn RemoteStore>>,
    cache: LocalCache,
    cache_unreadable: bool,
}

impl Session {
    /// Session that only uses the local cache
    pub fn local(cache: LocalCache) -> Self {
        Session {
            store: TransactionStore::new(),
            remote: None,
            cache,
            cache_unreadable: false,
        }
    }

    /// Session backed by a connected remote store
    pub fn with_remote(remote: Box<dyn RemoteStore>, cache: LocalCache) -> Self {
        Session {
            store: TransactionStore::new(),
            remote: Some(remote),
            cache,
            cache_unreadable: false,
        }
    }

    /// Wait for the remote store handshake and build the session
    ///
    /// If the sending side is dropped without delivering a store, the session
    /// runs on the local cache alone.
    pub async fn connect(
        cache: LocalCache,
        ready: oneshot::Receiver<Box<dyn RemoteStore>>,
    ) -> Self {
        match ready.await {
            Ok(remote) => {
                tracing::info!("Connected to {}", remote.name());
                Session::with_remote(remote, cache)
            }
            Err(_) => Session::local(cache),
        }
    }

    /// Name of the remote store, if one is attached
    pub fn remote_name(&self) -> Option<&str> {
        self.remote.as_deref().map(|remote| remote.name())
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.store.list()
    }

    pub fn totals(&self) -> Totals {
        core::totals(self.store.list())
    }

    pub fn monthly_breakdown(&self) -> MonthlyBreakdown {
        core::monthly_breakdown(self.store.list())
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Transaction> {
        core::filter(self.store.list(), criteria)
    }

    /// Snapshot of the store for export
    pub fn export(&self, export_date: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(self.store.list(), export_date)
    }

    /// Populate the store, preferring the remote store
    ///
    /// Never fails: when the remote store is absent or failing the local
    /// cache is used, and when that fails too the in-memory data is kept.
    pub async fn load(&mut self) -> LoadOutcome {
        let reason = match &self.remote {
            Some(remote) => match remote.load_all().await {
                Ok(transactions) => match self.store.replace_all(transactions) {
                    Ok(()) => {
                        tracing::info!(
                            "Loaded {} records from {}",
                            self.store.len(),
                            remote.name()
                        );
                        self.cache_unreadable = false;
                        self.refresh_cache();
                        return LoadOutcome::Persisted {
                            backend: remote.name().to_string(),
                            records: self.store.len(),
                        };
                    }
                    Err(e) => format!("remote store returned unusable data: {}", e),
                },
                Err(e) => e.to_string(),
            },
            None => "remote store unavailable".to_string(),
        };

        if self.remote.is_some() {
            tracing::warn!("Falling back to the local cache: {}", reason);
        } else {
            tracing::debug!("Reading the local cache: {}", reason);
        }

        let cache_failure = match self.cache.load() {
            Ok(transactions) => match self.store.replace_all(transactions) {
                Ok(()) => {
                    tracing::info!(
                        "Loaded {} records from {}",
                        self.store.len(),
                        self.cache.path().display()
                    );
                    self.cache_unreadable = false;
                    return LoadOutcome::Degraded {
                        reason,
                        source: DataSource::LocalCache,
                        records: self.store.len(),
                    };
                }
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };

        tracing::error!(
            "Local cache unusable, keeping in-memory data: {}",
            cache_failure
        );
        self.cache_unreadable = true;

        LoadOutcome::Degraded {
            reason: format!("{}; {}", reason, cache_failure),
            source: DataSource::Memory,
            records: self.store.len(),
        }
    }

    /// Validate and record a new transaction
    pub async fn create(&mut self, new: NewTransaction) -> Result<TransactionId, BookError> {
        match &self.remote {
            Some(remote) => {
                let transaction = self.store.prepare(new)?;
                remote.create(&transaction).await.map_err(remote_failure)?;
                let id = transaction.id;
                self.store.insert(transaction)?;
                self.refresh_cache();
                tracing::info!("Created transaction {}", id);
                Ok(id)
            }
            None => {
                self.ensure_cache_writable()?;
                let id = self.store.create(new)?;
                self.save_cache()?;
                tracing::info!("Created transaction {} locally", id);
                Ok(id)
            }
        }
    }

    /// Merge a partial update into an existing transaction
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is not in the store; `Validation` for a bad amount
    /// or description; `Persistence` if the change could not be stored.
    pub async fn update(
        &mut self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<(), BookError> {
        match &self.remote {
            Some(remote) => {
                let updated = self.store.updated(id, patch)?;
                remote.update(&updated).await.map_err(remote_failure)?;
                self.store.replace(updated)?;
                self.refresh_cache();
            }
            None => {
                self.ensure_cache_writable()?;
                self.store.update(id, patch)?;
                self.save_cache()?;
            }
        }
        tracing::info!("Updated transaction {}", id);
        Ok(())
    }

    /// Remove a transaction; absent ids are a no-op
    pub async fn delete(&mut self, id: TransactionId) -> Result<Option<Transaction>, BookError> {
        if self.store.get(id).is_none() {
            tracing::debug!("Delete of unknown transaction {} ignored", id);
            return Ok(None);
        }

        let removed = match &self.remote {
            Some(remote) => {
                remote.delete(id).await.map_err(remote_failure)?;
                let removed = self.store.delete(id);
                self.refresh_cache();
                removed
            }
            None => {
                self.ensure_cache_writable()?;
                let removed = self.store.delete(id);
                self.save_cache()?;
                removed
            }
        };
        tracing::info!("Deleted transaction {}", id);
        Ok(removed)
    }

    /// Replace the whole store with imported records
    ///
    /// The records are expected to have passed
    /// [`parse_import`](crate::io::parse_import); duplicate ids are still
    /// rejected here with `ImportFormat` and nothing changes.
    pub async fn import(&mut self, transactions: Vec<Transaction>) -> Result<usize, BookError> {
        if let Some(id) = core::transaction_store::first_duplicate_id(&transactions) {
            return Err(BookError::import_format(format!(
                "transaction id {} appears more than once",
                id
            )));
        }

        match &self.remote {
            Some(remote) => remote.save_all(&transactions).await.map_err(remote_failure)?,
            None => self.ensure_cache_writable()?,
        }

        let count = transactions.len();
        self.store.replace_all(transactions)?;
        match self.remote {
            Some(_) => self.refresh_cache(),
            None => self.save_cache()?,
        }
        tracing::info!("Imported {} records", count);
        Ok(count)
    }

    /// Create one transaction per valid row of a CSV file
    ///
    /// Rows that fail to parse or validate are skipped and listed in the
    /// report. A persistence failure stops the import; rows created before it
    /// are kept.
    pub async fn import_csv(&mut self, path: &Path) -> Result<CsvImportReport, BookError> {
        let reader = SyncReader::new(path)?;
        let mut report = CsvImportReport::default();

        for row in reader {
            let new = match row {
                Ok(new) => new,
                Err(message) => {
                    tracing::warn!("Skipping row: {}", message);
                    report.skipped.push(message);
                    continue;
                }
            };

            match self.create(new).await {
                Ok(id) => report.imported.push(id),
                Err(e) if e.is_user_error() => {
                    tracing::warn!("Skipping row: {}", e);
                    report.skipped.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Whether the last load found a cache file it could not read
    pub fn cache_unreadable(&self) -> bool {
        self.cache_unreadable
    }

    fn ensure_cache_writable(&self) -> Result<(), BookError> {
        if self.cache_unreadable {
            return Err(BookError::persistence(format!(
                "local cache {} could not be read; fix or remove it before making changes",
                self.cache.path().display()
            )));
        }
        Ok(())
    }

    fn save_cache(&self) -> Result<(), BookError> {
        self.cache.save(self.store.list())
    }

    /// Keep the fallback snapshot in step after the remote accepted a change
    fn refresh_cache(&self) {
        if self.cache_unreadable {
            tracing::warn!(
                "Not refreshing {}: the existing file could not be read",
                self.cache.path().display()
            );
            return;
        }
        if let Err(e) = self.save_cache() {
            tracing::warn!("Could not refresh the local cache: {}", e);
        }
    }
}

fn remote_failure(error: BookError) -> BookError {
    match error {
        BookError::Persistence { .. } => error,
        other => BookError::persistence(format!("remote store rejected the change: {}", other)),
    }
}
