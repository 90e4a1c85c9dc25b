//! File-backed remote store
//!
//! Keeps one user's records as a JSON array in a single document, read and
//! written with `tokio::fs`. Each change is a read-modify-write of the whole
//! document, serialized through an async mutex and published by renaming a
//! temporary file over the document so readers never see a partial write.

use crate::persistence::RemoteStore;
use crate::types::{BookError, Transaction, TransactionId};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct JsonFileRemote {
    path: PathBuf,
    name: String,
    write_lock: Mutex<()>,
}

impl JsonFileRemote {
    /// Open the user's document, creating its directory if needed
    ///
    /// An existing document must be readable; a missing one is treated as an
    /// empty store and created on the first write.
    pub async fn connect(path: &Path) -> Result<Self, BookError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| remote_error("create directory", parent, e))?;
        }

        let remote = JsonFileRemote {
            path: path.to_path_buf(),
            name: format!("remote store {}", path.display()),
            write_lock: Mutex::new(()),
        };
        remote.read().await?;

        Ok(remote)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Transaction>, BookError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(remote_error("read", &self.path, e)),
        };

        serde_json::from_str(&text).map_err(|e| {
            BookError::persistence(format!(
                "remote document {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write(&self, transactions: &[Transaction]) -> Result<(), BookError> {
        let text = serde_json::to_string_pretty(transactions)?;
        let staging = self.path.with_extension("json.tmp");

        tokio::fs::write(&staging, text)
            .await
            .map_err(|e| remote_error("write", &staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| remote_error("replace", &self.path, e))
    }

    /// Apply a change to the stored records under the write lock
    async fn modify<F>(&self, change: F) -> Result<(), BookError>
    where
        F: FnOnce(&mut Vec<Transaction>) -> Result<(), BookError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut transactions = self.read().await?;
        change(&mut transactions)?;
        self.write(&transactions).await
    }
}

impl RemoteStore for JsonFileRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_all(&self) -> BoxFuture<'_, Result<Vec<Transaction>, BookError>> {
        async move {
            let transactions = self.read().await?;
            tracing::debug!("Read {} records from {}", transactions.len(), self.name);
            Ok(transactions)
        }
        .boxed()
    }

    fn save_all<'a>(
        &'a self,
        transactions: &'a [Transaction],
    ) -> BoxFuture<'a, Result<(), BookError>> {
        async move {
            let _guard = self.write_lock.lock().await;
            self.write(transactions).await
        }
        .boxed()
    }

    fn create<'a>(&'a self, transaction: &'a Transaction) -> BoxFuture<'a, Result<(), BookError>> {
        self.modify(move |transactions| {
            if transactions.iter().any(|tx| tx.id == transaction.id) {
                return Err(BookError::persistence(format!(
                    "remote store already holds transaction {}",
                    transaction.id
                )));
            }
            transactions.insert(0, transaction.clone());
            Ok(())
        })
        .boxed()
    }

    fn update<'a>(&'a self, transaction: &'a Transaction) -> BoxFuture<'a, Result<(), BookError>> {
        self.modify(move |transactions| {
            let slot = transactions
                .iter_mut()
                .find(|tx| tx.id == transaction.id)
                .ok_or_else(|| BookError::not_found(transaction.id, "remote update"))?;
            *slot = transaction.clone();
            Ok(())
        })
        .boxed()
    }

    fn delete(&self, id: TransactionId) -> BoxFuture<'_, Result<(), BookError>> {
        self.modify(move |transactions| {
            transactions.retain(|tx| tx.id != id);
            Ok(())
        })
        .boxed()
    }
}

fn remote_error(action: &str, path: &Path, error: std::io::Error) -> BookError {
    BookError::persistence(format!(
        "failed to {} {}: {}",
        action,
        path.display(),
        error
    ))
}
