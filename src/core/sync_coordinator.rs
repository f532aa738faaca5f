//! Offline action replay
//!
//! The sync coordinator drains the durable offline queue through the
//! engine's normal submission path. It is triggered by an external
//! connectivity/background-sync signal; spurious triggers (nothing queued)
//! are a no-op, and one action's failure never aborts draining the rest.

use crate::core::TransactionEngine;
use crate::types::{EngineError, TransactionResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome summary of a drain pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Actions read from the queue at the start of the pass
    pub attempted: usize,

    /// Actions that settled successfully and were removed
    pub settled: usize,

    /// Actions whose settlement failed; left queued for a later pass
    pub failed: usize,

    /// Actions re-queued because connectivity dropped again mid-drain
    pub requeued: usize,

    /// Actions removed because they can never succeed (invalid payload)
    pub skipped: usize,
}

/// Replays queued offline actions through the transaction engine
///
/// Borrows queue entries for processing without mutating them: an entry is
/// either fully consumed (submitted and removed) or left untouched for the
/// next pass.
pub struct SyncCoordinator {
    engine: Arc<TransactionEngine>,
}

impl SyncCoordinator {
    /// Create a coordinator over the given engine
    pub fn new(engine: Arc<TransactionEngine>) -> Self {
        SyncCoordinator { engine }
    }

    /// Drain all currently queued actions, in enqueue order
    ///
    /// For each queued action the coordinator attempts a normal engine
    /// submission with the action's original payload:
    ///
    /// - settled: the entry is removed from the queue
    /// - settlement failed: the entry stays queued and draining continues
    /// - queued again (connectivity lost mid-drain): the engine created a
    ///   fresh entry, so the old one is removed to keep exactly one copy
    /// - invalid payload: the entry is removed; it can never succeed
    ///
    /// Re-running against an already-drained queue is a no-op.
    ///
    /// # Errors
    ///
    /// Only queue-read faults abort the pass; per-action failures are
    /// logged and skipped.
    pub async fn drain(&self) -> Result<DrainReport, EngineError> {
        let actions = self.engine.offline_queue().drain_all()?;
        let mut report = DrainReport {
            attempted: actions.len(),
            ..DrainReport::default()
        };

        if actions.is_empty() {
            return Ok(report);
        }
        info!(count = actions.len(), "draining offline actions");

        for action in actions {
            match self.engine.submit(action.payload.clone()).await {
                Ok(TransactionResult::Settled(record)) => {
                    self.engine.offline_queue().remove(action.id)?;
                    report.settled += 1;
                    info!(queue_id = action.id, tx = %record.id, "offline action replayed");
                }
                Ok(TransactionResult::Failed(record)) => {
                    report.failed += 1;
                    warn!(
                        queue_id = action.id,
                        error = record.error.as_deref().unwrap_or_default(),
                        "offline action failed, left queued"
                    );
                }
                Ok(TransactionResult::Queued(fresh)) => {
                    // The engine re-enqueued the payload under a new id
                    self.engine.offline_queue().remove(action.id)?;
                    report.requeued += 1;
                    warn!(
                        queue_id = action.id,
                        new_queue_id = fresh.id,
                        "connectivity lost mid-drain, action re-queued"
                    );
                }
                Err(err @ EngineError::ValidationError { .. }) => {
                    // A payload the engine will never accept; retrying is pointless
                    self.engine.offline_queue().remove(action.id)?;
                    report.skipped += 1;
                    warn!(queue_id = action.id, error = %err, "invalid queued action dropped");
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(queue_id = action.id, error = %err, "offline action not replayable yet");
                }
            }
        }

        Ok(report)
    }
}
