//! Transaction store
//!
//! This module provides the TransactionStore component that holds the user's
//! transactions in memory and exposes create, read, update and delete by id.
//!
//! # Ordering
//!
//! Newly created records are inserted at the front, so a store that is only
//! fed through `create` lists newest first. Records loaded from a backend keep
//! whatever order the backend returned. Nothing downstream depends on order:
//! aggregation treats the list as a multiset keyed by id.
//!
//! # Validation
//!
//! `create` and `update` reject a non-positive amount and an empty or
//! whitespace-only description before touching any state. Records that
//! arrive through `replace_all` (load and import) are not re-validated;
//! they are only required to have unique ids.

use crate::core::id_generator::IdGenerator;
use crate::types::{
    BookError, NewTransaction, Transaction, TransactionId, TransactionPatch, DATE_FORMAT,
    MAX_AMOUNT,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// In-memory transaction store
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Records in store order, newest created first
    transactions: Vec<Transaction>,

    /// Source of fresh ids, advanced past every id the store has held
    ids: IdGenerator,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, identify and insert a new transaction
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionId)` - The id assigned to the new record
    /// * `Err(BookError::Validation)` - If the amount or description is invalid
    pub fn create(&mut self, new: NewTransaction) -> Result<TransactionId, BookError> {
        let transaction = self.prepare(new)?;
        let id = transaction.id;
        self.insert(transaction)?;
        Ok(id)
    }

    /// Validate a new transaction and give it an id without inserting it
    ///
    /// Used when a backend has to accept the record before it may appear in
    /// memory. The id is reserved even if the record is never inserted.
    pub fn prepare(&mut self, new: NewTransaction) -> Result<Transaction, BookError> {
        validate_amount(new.amount)?;
        let description = validate_description(&new.description)?;

        Ok(Transaction {
            id: self.ids.next_id(),
            tx_type: new.tx_type,
            amount: Some(new.amount),
            description,
            date: new.date.format(DATE_FORMAT).to_string(),
            created_at: Some(Utc::now()),
            updated_at: None,
        })
    }

    /// Insert an already-identified transaction at the front
    ///
    /// # Errors
    ///
    /// Returns a Validation error if a record with the same id is present.
    pub fn insert(&mut self, transaction: Transaction) -> Result<(), BookError> {
        if self.get(transaction.id).is_some() {
            return Err(BookError::validation(
                "id",
                &format!("transaction {} already exists", transaction.id),
            ));
        }

        self.ids.observe(transaction.id);
        self.transactions.insert(0, transaction);
        Ok(())
    }

    /// Get a stored transaction by id
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Merge a partial update into the record with the given id
    ///
    /// # Errors
    ///
    /// * `BookError::NotFound` - No record has this id
    /// * `BookError::Validation` - A patched amount or description is invalid
    ///
    /// On error the store is unchanged.
    pub fn update(&mut self, id: TransactionId, patch: &TransactionPatch) -> Result<(), BookError> {
        let updated = self.updated(id, patch)?;
        self.replace(updated)
    }

    /// Compute the result of applying a patch without storing it
    pub fn updated(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, BookError> {
        let mut transaction = self
            .get(id)
            .cloned()
            .ok_or_else(|| BookError::not_found(id, "update"))?;

        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            transaction.amount = Some(amount);
        }
        if let Some(description) = &patch.description {
            transaction.description = validate_description(description)?;
        }
        if let Some(tx_type) = patch.tx_type {
            transaction.tx_type = tx_type;
        }
        if let Some(date) = patch.date {
            transaction.date = date.format(DATE_FORMAT).to_string();
        }
        transaction.updated_at = Some(Utc::now());

        Ok(transaction)
    }

    /// Overwrite the stored record that has the same id, keeping its position
    pub fn replace(&mut self, transaction: Transaction) -> Result<(), BookError> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|tx| tx.id == transaction.id)
            .ok_or_else(|| BookError::not_found(transaction.id, "update"))?;
        *slot = transaction;
        Ok(())
    }

    /// Remove the record with the given id
    ///
    /// Returns the removed record, or `None` (and does nothing) when absent.
    pub fn delete(&mut self, id: TransactionId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|tx| tx.id == id)?;
        Some(self.transactions.remove(index))
    }

    /// Current records in store order
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Replace the whole contents of the store
    ///
    /// # Errors
    ///
    /// Returns a Validation error, leaving the store untouched, if two records
    /// share an id.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) -> Result<(), BookError> {
        if let Some(id) = first_duplicate_id(&transactions) {
            return Err(BookError::validation(
                "id",
                &format!("transaction {} appears more than once", id),
            ));
        }

        for tx in &transactions {
            self.ids.observe(tx.id);
        }
        self.transactions = transactions;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Amounts entered through the store must be strictly positive and at most
/// [`MAX_AMOUNT`]
pub fn validate_amount(amount: Decimal) -> Result<(), BookError> {
    if amount <= Decimal::ZERO {
        return Err(BookError::validation("amount", "must be greater than zero"));
    }
    if amount > MAX_AMOUNT {
        return Err(BookError::validation(
            "amount",
            &format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(())
}

/// Descriptions must contain something other than whitespace
///
/// Returns the trimmed description.
pub fn validate_description(description: &str) -> Result<String, BookError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(BookError::validation("description", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// First id that occurs more than once, if any
pub fn first_duplicate_id(transactions: &[Transaction]) -> Option<TransactionId> {
    let mut seen = HashSet::with_capacity(transactions.len());
    transactions
        .iter()
        .map(|tx| tx.id)
        .find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_tx(tx_type: TransactionType, amount: i64, description: &str) -> NewTransaction {
        NewTransaction::new(
            tx_type,
            Decimal::new(amount, 0),
            description,
            date(2024, 1, 5),
        )
    }

    fn stored(id: TransactionId) -> Transaction {
        Transaction {
            id,
            tx_type: TransactionType::Expense,
            amount: Some(Decimal::new(10, 0)),
            description: format!("record {}", id),
            date: "2024-03-01".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn sorted_ids(store: &TransactionStore) -> Vec<TransactionId> {
        let mut ids: Vec<_> = store.list().iter().map(|tx| tx.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_create_and_retrieve_transaction() {
        let mut store = TransactionStore::new();

        let id = store
            .create(new_tx(TransactionType::Income, 100, "  Salary  "))
            .unwrap();

        let tx = store.get(id).unwrap();
        assert_eq!(tx.tx_type, TransactionType::Income);
        assert_eq!(tx.amount, Some(Decimal::new(100, 0)));
        assert_eq!(tx.description, "Salary");
        assert_eq!(tx.date, "2024-01-05");
        assert!(tx.created_at.is_some());
        assert!(tx.updated_at.is_none());
    }

    #[test]
    fn test_create_inserts_newest_first() {
        let mut store = TransactionStore::new();

        let first = store
            .create(new_tx(TransactionType::Income, 1, "first"))
            .unwrap();
        let second = store
            .create(new_tx(TransactionType::Expense, 2, "second"))
            .unwrap();

        let ids: Vec<_> = store.list().iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_ne!(first, second);
    }

    #[rstest]
    #[case::zero_amount(0, "Rent", "amount")]
    #[case::negative_amount(-5, "Rent", "amount")]
    #[case::above_maximum(1_000_000_000_000_001, "Yacht", "amount")]
    #[case::empty_description(10, "", "description")]
    #[case::whitespace_description(10, "   \t", "description")]
    fn test_create_rejects_invalid_input(
        #[case] amount: i64,
        #[case] description: &str,
        #[case] expected_field: &str,
    ) {
        let mut store = TransactionStore::new();

        let result = store.create(new_tx(TransactionType::Expense, amount, description));

        match result.unwrap_err() {
            BookError::Validation { field, .. } => assert_eq!(field, expected_field),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_ids_skip_loaded_ids() {
        let mut store = TransactionStore::new();
        let far_future = i64::MAX / 2;
        store.replace_all(vec![stored(far_future)]).unwrap();

        let id = store
            .create(new_tx(TransactionType::Income, 5, "after load"))
            .unwrap();
        assert_eq!(id, far_future + 1);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = TransactionStore::new();
        let id = store
            .create(new_tx(TransactionType::Income, 100, "Salary"))
            .unwrap();

        let patch = TransactionPatch {
            amount: Some(Decimal::new(12050, 2)),
            date: Some(date(2024, 2, 1)),
            ..TransactionPatch::default()
        };
        store.update(id, &patch).unwrap();

        let tx = store.get(id).unwrap();
        assert_eq!(tx.amount, Some(Decimal::new(12050, 2)));
        assert_eq!(tx.date, "2024-02-01");
        assert_eq!(tx.description, "Salary");
        assert_eq!(tx.tx_type, TransactionType::Income);
        assert!(tx.updated_at.is_some());
    }

    #[test]
    fn test_update_keeps_position() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(1), stored(2), stored(3)]).unwrap();

        let patch = TransactionPatch {
            tx_type: Some(TransactionType::Income),
            ..TransactionPatch::default()
        };
        store.update(2, &patch).unwrap();

        let ids: Vec<_> = store.list().iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.get(2).unwrap().tx_type, TransactionType::Income);
    }

    #[test]
    fn test_update_nonexistent_transaction() {
        let mut store = TransactionStore::new();

        let result = store.update(999, &TransactionPatch::default());
        assert!(matches!(
            result.unwrap_err(),
            BookError::NotFound { id: 999, .. }
        ));
    }

    #[rstest]
    #[case::zero_amount(TransactionPatch {
        amount: Some(Decimal::ZERO),
        ..TransactionPatch::default()
    })]
    #[case::above_maximum(TransactionPatch {
        amount: Some(Decimal::MAX),
        ..TransactionPatch::default()
    })]
    #[case::blank_description(TransactionPatch {
        description: Some("  ".to_string()),
        ..TransactionPatch::default()
    })]
    #[case::valid_type_invalid_amount(TransactionPatch {
        tx_type: Some(TransactionType::Income),
        amount: Some(Decimal::new(-1, 0)),
        ..TransactionPatch::default()
    })]
    fn test_update_rejects_invalid_patch_without_mutation(#[case] patch: TransactionPatch) {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(1)]).unwrap();
        let before = store.get(1).cloned();

        let result = store.update(1, &patch);

        assert!(matches!(result.unwrap_err(), BookError::Validation { .. }));
        assert_eq!(store.get(1).cloned(), before);
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(1), stored(2)]).unwrap();

        let removed = store.delete(1);

        assert_eq!(removed.map(|tx| tx.id), Some(1));
        assert_eq!(sorted_ids(&store), vec![2]);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(1)]).unwrap();

        assert!(store.delete(42).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_then_delete_restores_contents() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(10), stored(20)]).unwrap();
        let before = sorted_ids(&store);

        let id = store
            .create(new_tx(TransactionType::Expense, 40, "Coffee"))
            .unwrap();
        store.delete(id);

        assert_eq!(sorted_ids(&store), before);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut store = TransactionStore::new();
        store.insert(stored(5)).unwrap();

        let result = store.insert(stored(5));

        assert!(matches!(result.unwrap_err(), BookError::Validation { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_all_rejects_duplicates_and_keeps_contents() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(1)]).unwrap();

        let result = store.replace_all(vec![stored(2), stored(3), stored(2)]);

        assert!(result.is_err());
        assert_eq!(sorted_ids(&store), vec![1]);
    }

    #[test]
    fn test_replace_all_keeps_given_order() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![stored(3), stored(1), stored(2)]).unwrap();

        let ids: Vec<_> = store.list().iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_prepare_reserves_unique_ids() {
        let mut store = TransactionStore::new();
        let a = store
            .prepare(new_tx(TransactionType::Income, 1, "a"))
            .unwrap();
        let b = store
            .prepare(new_tx(TransactionType::Income, 1, "b"))
            .unwrap();

        assert_ne!(a.id, b.id);
        assert!(store.is_empty());
    }

    #[test]
    fn test_first_duplicate_id() {
        assert_eq!(first_duplicate_id(&[stored(1), stored(2)]), None);
        assert_eq!(
            first_duplicate_id(&[stored(1), stored(2), stored(1)]),
            Some(1)
        );
    }
}
