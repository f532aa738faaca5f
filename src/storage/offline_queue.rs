//! Durable offline action queue
//!
//! Actions that cannot be submitted while disconnected are queued here and
//! replayed later by the sync coordinator. Every operation acts on durable
//! storage, so enqueuing from one execution context and draining from
//! another is safe.
//!
//! Ids come from an AUTOINCREMENT column: a removed id is never reissued,
//! so a `remove` after a successful drain step cannot race with a
//! concurrent `enqueue` into a duplicate id.

use crate::storage::Database;
use crate::types::{ActionPayload, EngineError, OfflineAction};
use chrono::{DateTime, Utc};
use rusqlite::params;

/// Default bound on the number of queued actions.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Durable queue of actions awaiting replay
///
/// The queue is the sole owner of its entries; consumers either fully
/// consume an entry (submit + remove) or leave it untouched.
#[derive(Clone)]
pub struct OfflineQueue {
    db: Database,
    capacity: usize,
}

impl OfflineQueue {
    /// Create a queue over the given database with the default capacity
    pub fn new(db: Database) -> Self {
        Self::with_capacity(db, DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a queue with an explicit capacity bound
    pub fn with_capacity(db: Database, capacity: usize) -> Self {
        OfflineQueue { db, capacity }
    }

    /// Durably enqueue an action payload
    ///
    /// # Returns
    ///
    /// The id assigned to the queued action.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::QueueFull` when the queue is at capacity, or
    /// `EngineError::StorageError` on database failure.
    pub fn enqueue(&self, payload: &ActionPayload) -> Result<i64, EngineError> {
        let conn = self.db.lock();

        let len: i64 =
            conn.query_row("SELECT COUNT(*) FROM offline_actions", [], |row| row.get(0))?;
        if len as usize >= self.capacity {
            return Err(EngineError::QueueFull {
                capacity: self.capacity,
            });
        }

        conn.execute(
            "INSERT INTO offline_actions (action_type, payload, enqueued_at)
             VALUES (?1, ?2, ?3)",
            params![
                payload.action_type().to_string(),
                serde_json::to_string(payload)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All currently queued actions, in enqueue order
    ///
    /// Non-destructive: entries stay queued until explicitly removed.
    pub fn drain_all(&self) -> Result<Vec<OfflineAction>, EngineError> {
        let raw: Vec<(i64, String, String)> = {
            let conn = self.db.lock();
            let mut stmt = conn.prepare(
                "SELECT id, payload, enqueued_at FROM offline_actions ORDER BY id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        raw.into_iter()
            .map(|(id, payload, enqueued_at)| {
                Ok(OfflineAction {
                    id,
                    payload: serde_json::from_str(&payload)?,
                    enqueued_at: DateTime::parse_from_rfc3339(&enqueued_at)
                        .map_err(|e| {
                            EngineError::storage(format!(
                                "invalid timestamp '{}': {}",
                                enqueued_at, e
                            ))
                        })?
                        .with_timezone(&Utc),
                })
            })
            .collect()
    }

    /// Remove an action by id
    ///
    /// Idempotent: removing an id that is already gone is a no-op, not an
    /// error.
    pub fn remove(&self, id: i64) -> Result<(), EngineError> {
        self.db
            .lock()
            .execute("DELETE FROM offline_actions WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Number of currently queued actions
    pub fn len(&self) -> Result<usize, EngineError> {
        let len: i64 = self
            .db
            .lock()
            .query_row("SELECT COUNT(*) FROM offline_actions", [], |row| row.get(0))?;
        Ok(len as usize)
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> Result<bool, EngineError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn like(target: &str) -> ActionPayload {
        ActionPayload::Like {
            target_post: target.into(),
        }
    }

    #[test]
    fn test_enqueue_and_drain_in_order() {
        let queue = OfflineQueue::new(Database::open_in_memory().unwrap());

        let first = queue.enqueue(&like("a")).unwrap();
        let second = queue.enqueue(&like("b")).unwrap();

        let actions = queue.drain_all().unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].id, first);
        assert_eq!(actions[1].id, second);
        assert_eq!(actions[0].payload, like("a"));
    }

    #[test]
    fn test_drain_is_non_destructive() {
        let queue = OfflineQueue::new(Database::open_in_memory().unwrap());
        queue.enqueue(&like("a")).unwrap();

        queue.drain_all().unwrap();
        assert_eq!(queue.len().unwrap(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let queue = OfflineQueue::new(Database::open_in_memory().unwrap());
        let id = queue.enqueue(&like("a")).unwrap();

        queue.remove(id).unwrap();
        assert!(queue.is_empty().unwrap());

        // Second removal of the same id is a no-op
        queue.remove(id).unwrap();
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_removed_ids_are_never_reused() {
        let queue = OfflineQueue::new(Database::open_in_memory().unwrap());
        let first = queue.enqueue(&like("a")).unwrap();
        queue.remove(first).unwrap();

        let second = queue.enqueue(&like("b")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_capacity_bound() {
        let queue = OfflineQueue::with_capacity(Database::open_in_memory().unwrap(), 2);
        queue.enqueue(&like("a")).unwrap();
        queue.enqueue(&like("b")).unwrap();

        let err = queue.enqueue(&like("c")).unwrap_err();
        assert!(matches!(err, EngineError::QueueFull { capacity: 2 }));
        assert_eq!(queue.len().unwrap(), 2);
    }

    #[test]
    fn test_queue_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queue.db");

        let id = {
            let queue = OfflineQueue::new(Database::open(&path).unwrap());
            queue.enqueue(&like("persisted")).unwrap()
        };

        let queue = OfflineQueue::new(Database::open(&path).unwrap());
        let actions = queue.drain_all().unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, id);
        assert_eq!(actions[0].payload, like("persisted"));
    }
}
