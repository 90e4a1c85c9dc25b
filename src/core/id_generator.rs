//! Time-derived transaction identifiers
//!
//! Ids are the creation time in milliseconds since the Unix epoch. When two
//! transactions are created within the same millisecond, or when the store
//! already holds an id from the future (clock skew on another device), the
//! next id is bumped past the largest one seen so ids remain unique and
//! strictly increasing.

use crate::types::TransactionId;
use chrono::Utc;

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: TransactionId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a fresh id greater than every id issued or observed so far
    pub fn next_id(&mut self) -> TransactionId {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    /// Record an id that already exists so it is never issued again
    pub fn observe(&mut self, id: TransactionId) {
        self.last = self.last.max(id);
    }

    fn next_id_at(&mut self, now_millis: TransactionId) -> TransactionId {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
