//! Persistence module
//!
//! The bookkeeper keeps its records in two places:
//!
//! - a **remote store**, the authoritative copy scoped to the signed-in user,
//!   reached through the [`RemoteStore`] trait;
//! - a **local cache**, a snapshot on this machine that is used whenever the
//!   remote store is absent or failing.
//!
//! [`Session`] ties the in-memory [`TransactionStore`](crate::core::TransactionStore)
//! to both and reports which one a load was served from.
//!
//! # Readiness
//!
//! Connecting to the remote store happens on a background task. The task hands
//! the connected store to the session through a oneshot channel
//! ([`connect_remote`]); if it cannot connect it drops the sender and the
//! session runs on the local cache alone.

use crate::config::Config;
use crate::types::{BookError, Transaction, TransactionId};
use futures::future::BoxFuture;
use tokio::sync::oneshot;

pub mod json_remote;
pub mod local_cache;
pub mod session;

pub use json_remote::JsonFileRemote;
pub use local_cache::LocalCache;
pub use session::{CsvImportReport, DataSource, LoadOutcome, Session};

/// Authoritative, user-scoped transaction storage
///
/// Every call may fail; the session turns failures into
/// `BookError::Persistence` and keeps its in-memory state unchanged.
pub trait RemoteStore: Send + Sync {
    /// Human-readable name used in logs and load outcomes
    fn name(&self) -> &str;

    /// Fetch every record, in the order the backend keeps them
    fn load_all(&self) -> BoxFuture<'_, Result<Vec<Transaction>, BookError>>;

    /// Replace every record
    fn save_all<'a>(
        &'a self,
        transactions: &'a [Transaction],
    ) -> BoxFuture<'a, Result<(), BookError>>;

    /// Add one record
    fn create<'a>(&'a self, transaction: &'a Transaction) -> BoxFuture<'a, Result<(), BookError>>;

    /// Overwrite the record with the same id
    fn update<'a>(&'a self, transaction: &'a Transaction) -> BoxFuture<'a, Result<(), BookError>>;

    /// Remove a record; removing an absent id succeeds
    fn delete(&self, id: TransactionId) -> BoxFuture<'_, Result<(), BookError>>;
}

/// Start connecting to the configured remote store
///
/// Returns the receiving half of the readiness handshake. The sender is
/// dropped without a value when no user is signed in, when running offline,
/// or when the connection fails. Must be called from within a tokio runtime.
pub fn connect_remote(config: &Config) -> oneshot::Receiver<Box<dyn RemoteStore>> {
    let (ready, receiver) = oneshot::channel();

    let Some(path) = config.remote_path() else {
        tracing::info!("No remote store configured, using the local cache only");
        return receiver;
    };

    tokio::spawn(async move {
        match JsonFileRemote::connect(&path).await {
            Ok(remote) => {
                tracing::debug!("Remote store ready at {}", path.display());
                let _ = ready.send(Box::new(remote) as Box<dyn RemoteStore>);
            }
            Err(e) => {
                tracing::warn!("Could not connect to remote store: {}", e);
            }
        }
    });

    receiver
}
