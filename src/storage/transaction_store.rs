//! Durable transaction history
//!
//! This module provides the TransactionStore component, an append-only
//! persisted log of transaction records. Records are never mutated after
//! insertion; a submission's final state is written exactly once, after
//! settlement resolves.
//!
//! Statistics are derived on demand from the log and never cached.

use crate::storage::Database;
use crate::types::{
    ActionPayload, EngineError, TransactionRecord, TransactionStats, TransactionStatus,
};
use chrono::{DateTime, Utc};
use rusqlite::params;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Append-only persisted log of transaction records
///
/// Backed by the shared SQLite database; all reads and writes are durable.
#[derive(Clone)]
pub struct TransactionStore {
    db: Database,
}

impl TransactionStore {
    /// Create a store over the given database handle
    pub fn new(db: Database) -> Self {
        TransactionStore { db }
    }

    /// Append a record to the log
    ///
    /// Never mutates existing records. Insertion order is preserved for
    /// `all()` via the table's rowid.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StorageError` on database or serialization
    /// failure.
    pub fn append(&self, record: &TransactionRecord) -> Result<(), EngineError> {
        let payload = serde_json::to_string(&record.payload)?;
        self.db.lock().execute(
            "INSERT INTO transactions (id, action_type, payload, fee, status, signature, error, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.action_type().to_string(),
                payload,
                record.fee.to_string(),
                record.status.to_string(),
                record.signature,
                record.error,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All records, ordered by insertion
    pub fn all(&self) -> Result<Vec<TransactionRecord>, EngineError> {
        self.query("SELECT id, payload, fee, status, signature, error, created_at
                    FROM transactions ORDER BY rowid", None)
    }

    /// Records with the given status, ordered by insertion
    pub fn by_status(&self, status: TransactionStatus) -> Result<Vec<TransactionRecord>, EngineError> {
        self.query(
            "SELECT id, payload, fee, status, signature, error, created_at
             FROM transactions WHERE status = ?1 ORDER BY rowid",
            Some(status.to_string()),
        )
    }

    /// Remove all records
    ///
    /// Destructive; used only for an explicit user-initiated history reset.
    pub fn clear(&self) -> Result<(), EngineError> {
        self.db.lock().execute("DELETE FROM transactions", [])?;
        Ok(())
    }

    /// Derived statistics over the full history
    ///
    /// Recomputed from the log on every call. The success rate is 0 for an
    /// empty store.
    pub fn stats(&self) -> Result<TransactionStats, EngineError> {
        let records = self.all()?;

        let mut success_count = 0;
        let mut failed_count = 0;
        let mut pending_count = 0;
        let mut total_fees_successful = Decimal::ZERO;

        for record in &records {
            match record.status {
                TransactionStatus::Success => {
                    success_count += 1;
                    total_fees_successful += record.fee;
                }
                TransactionStatus::Failed => failed_count += 1,
                TransactionStatus::Pending => pending_count += 1,
            }
        }

        let total = records.len();
        let success_rate_percent = if total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(success_count as u64) * Decimal::ONE_HUNDRED
                / Decimal::from(total as u64)
        };

        Ok(TransactionStats {
            total,
            success_count,
            failed_count,
            pending_count,
            total_fees_successful,
            success_rate_percent,
        })
    }

    fn query(
        &self,
        sql: &str,
        status: Option<String>,
    ) -> Result<Vec<TransactionRecord>, EngineError> {
        type Row = (
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            String,
        );

        let raw: Vec<Row> = {
            let conn = self.db.lock();
            let mut stmt = conn.prepare(sql)?;
            let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<Row> {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            };
            let rows = match &status {
                Some(s) => stmt.query_map(params![s], map_row)?,
                None => stmt.query_map([], map_row)?,
            };
            rows.collect::<rusqlite::Result<Vec<Row>>>()?
        };

        raw.into_iter().map(Self::decode_row).collect()
    }

    fn decode_row(
        (id, payload, fee, status, signature, error, created_at): (
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            String,
        ),
    ) -> Result<TransactionRecord, EngineError> {
        let payload: ActionPayload = serde_json::from_str(&payload)?;
        let fee = Decimal::from_str(&fee)
            .map_err(|e| EngineError::storage(format!("invalid fee '{}': {}", fee, e)))?;
        let status = status.parse::<TransactionStatus>()?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| EngineError::storage(format!("invalid timestamp '{}': {}", created_at, e)))?
            .with_timezone(&Utc);

        Ok(TransactionRecord {
            id,
            payload,
            fee,
            status,
            signature,
            error,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store() -> TransactionStore {
        TransactionStore::new(Database::open_in_memory().unwrap())
    }

    fn settled_record(content: &str, fee: Decimal) -> TransactionRecord {
        let mut record = TransactionRecord::draft(
            ActionPayload::Post {
                content: content.into(),
            },
            fee,
        );
        record.mark_success(format!("sig-{}", content));
        record
    }

    fn failed_record(target: &str) -> TransactionRecord {
        let mut record = TransactionRecord::draft(
            ActionPayload::Like {
                target_post: target.into(),
            },
            Decimal::new(5, 4),
        );
        record.mark_failed("insufficient balance".into());
        record
    }

    #[test]
    fn test_append_and_read_back() {
        let store = store();
        let record = settled_record("hello", Decimal::new(1, 3));

        store.append(&record).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], record);
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let store = store();
        let first = settled_record("one", Decimal::new(1, 3));
        let second = failed_record("42");
        let third = settled_record("three", Decimal::new(1, 3));

        store.append(&first).unwrap();
        store.append(&second).unwrap();
        store.append(&third).unwrap();

        let ids: Vec<String> = store.all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[rstest]
    #[case::success(TransactionStatus::Success, 2)]
    #[case::failed(TransactionStatus::Failed, 1)]
    #[case::pending(TransactionStatus::Pending, 0)]
    fn test_by_status_filters(#[case] status: TransactionStatus, #[case] expected: usize) {
        let store = store();
        store
            .append(&settled_record("a", Decimal::new(1, 3)))
            .unwrap();
        store
            .append(&settled_record("b", Decimal::new(1, 3)))
            .unwrap();
        store.append(&failed_record("42")).unwrap();

        assert_eq!(store.by_status(status).unwrap().len(), expected);
    }

    #[test]
    fn test_stats_on_empty_store() {
        let stats = store().stats().unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate_percent, Decimal::ZERO);
        assert_eq!(stats.total_fees_successful, Decimal::ZERO);
    }

    #[test]
    fn test_stats_sums_successful_fees_only() {
        let store = store();
        store
            .append(&settled_record("a", Decimal::new(1, 3)))
            .unwrap();
        store
            .append(&settled_record("b", Decimal::new(2, 3)))
            .unwrap();
        store.append(&failed_record("42")).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.failed_count, 1);
        assert_eq!(stats.pending_count, 0);
        assert_eq!(stats.total_fees_successful, Decimal::new(3, 3));
    }

    #[test]
    fn test_stats_success_rate() {
        let store = store();
        store
            .append(&settled_record("a", Decimal::new(1, 3)))
            .unwrap();
        store.append(&failed_record("42")).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.success_rate_percent, Decimal::new(50, 0));
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = store();
        store
            .append(&settled_record("a", Decimal::new(1, 3)))
            .unwrap();
        store.clear().unwrap();

        assert!(store.all().unwrap().is_empty());
        assert_eq!(store.stats().unwrap().total, 0);
    }
}
