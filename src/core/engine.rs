//! Transaction lifecycle engine
//!
//! This module provides the TransactionEngine that orchestrates the full
//! lifecycle of a fee-bearing social action: precondition checks, draft
//! construction, settlement, persistence, and subscriber notification.
//!
//! The engine enforces the lifecycle rules:
//! - Wallet must be connected before anything else happens
//! - Payloads are validated before a record exists
//! - At most one transaction is in flight per engine instance
//! - `on_start` fires synchronously before any asynchronous work
//! - Every failure path returns the engine to idle
//!
//! When the connectivity probe reports offline, the action is durably
//! queued instead of failed; the sync coordinator replays it later through
//! this same submission path.

use crate::core::fee_policy::{FeeConfig, FeePolicy, FeeSplit};
use crate::settlement::{ConnectivityProbe, SettlementBackend};
use crate::storage::{Database, OfflineQueue, TransactionStore};
use crate::types::{
    ActionPayload, ActionType, EngineError, EngineState, OfflineAction, TransactionRecord,
    TransactionResult, TransactionStats, TransactionStatus,
};
use crate::wallet::WalletProvider;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{info, warn};

/// Handler for the start of a lifecycle, receiving the pending draft
pub type StartHandler = Arc<dyn Fn(&TransactionRecord) + Send + Sync>;

/// Handler receiving the resolved submission result
pub type ResultHandler = Arc<dyn Fn(&TransactionResult) + Send + Sync>;

/// Handler receiving a settlement-stage error
pub type ErrorHandler = Arc<dyn Fn(&EngineError) + Send + Sync>;

/// Subscriber callbacks for lifecycle notifications
///
/// At most one handler is active per event. Merging a new set replaces
/// only the events it names; absent events keep their current handler.
#[derive(Clone, Default)]
pub struct TransactionCallbacks {
    /// Fired synchronously when a draft enters the lifecycle
    pub on_start: Option<StartHandler>,

    /// Fired after a successful settlement is persisted
    pub on_success: Option<ResultHandler>,

    /// Fired after a failed settlement is persisted
    pub on_error: Option<ErrorHandler>,

    /// Fired last for every completed or queued lifecycle
    pub on_complete: Option<ResultHandler>,
}

impl TransactionCallbacks {
    /// Create an empty callback set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start handler
    pub fn on_start(mut self, f: impl Fn(&TransactionRecord) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(f));
        self
    }

    /// Set the success handler
    pub fn on_success(mut self, f: impl Fn(&TransactionResult) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Set the error handler
    pub fn on_error(mut self, f: impl Fn(&EngineError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Set the complete handler
    pub fn on_complete(mut self, f: impl Fn(&TransactionResult) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(f));
        self
    }

    fn merge(&mut self, other: TransactionCallbacks) {
        if other.on_start.is_some() {
            self.on_start = other.on_start;
        }
        if other.on_success.is_some() {
            self.on_success = other.on_success;
        }
        if other.on_error.is_some() {
            self.on_error = other.on_error;
        }
        if other.on_complete.is_some() {
            self.on_complete = other.on_complete;
        }
    }
}

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on a single settlement attempt; expiry becomes a
    /// transport fault
    pub settlement_timeout: Duration,

    /// Bound on the offline queue
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            settlement_timeout: Duration::from_secs(30),
            queue_capacity: crate::storage::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Orchestrates the transaction lifecycle
///
/// Holds its own state and callback map; multiple engine instances are
/// independent, so tests can build as many as they need. Collaborators
/// (wallet, settlement backend, connectivity probe) are injected as trait
/// objects.
pub struct TransactionEngine {
    wallet: Arc<dyn WalletProvider>,
    settlement: Arc<dyn SettlementBackend>,
    connectivity: Arc<dyn ConnectivityProbe>,
    fee_policy: FeePolicy,
    store: TransactionStore,
    queue: OfflineQueue,
    state: Mutex<EngineState>,
    callbacks: Mutex<TransactionCallbacks>,
    config: EngineConfig,
}

impl TransactionEngine {
    /// Create an engine with default fee and engine configuration
    pub fn new(
        db: Database,
        wallet: Arc<dyn WalletProvider>,
        settlement: Arc<dyn SettlementBackend>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self::with_config(
            db,
            wallet,
            settlement,
            connectivity,
            FeeConfig::default(),
            EngineConfig::default(),
        )
    }

    /// Create an engine with explicit fee and engine configuration
    pub fn with_config(
        db: Database,
        wallet: Arc<dyn WalletProvider>,
        settlement: Arc<dyn SettlementBackend>,
        connectivity: Arc<dyn ConnectivityProbe>,
        fee_config: FeeConfig,
        config: EngineConfig,
    ) -> Self {
        let store = TransactionStore::new(db.clone());
        let queue = OfflineQueue::with_capacity(db, config.queue_capacity);
        TransactionEngine {
            wallet,
            settlement,
            connectivity,
            fee_policy: FeePolicy::new(fee_config),
            store,
            queue,
            state: Mutex::new(EngineState::default()),
            callbacks: Mutex::new(TransactionCallbacks::default()),
            config,
        }
    }

    /// Submit a social action as a fee-bearing transaction
    ///
    /// Runs the full lifecycle: precondition checks, fee computation, the
    /// start notification, settlement (or offline queuing), persistence,
    /// and the success/error/complete notifications.
    ///
    /// # Returns
    ///
    /// - `Ok(TransactionResult::Settled)` - settlement succeeded; exactly
    ///   one SUCCESS record was persisted
    /// - `Ok(TransactionResult::Failed)` - settlement failed; exactly one
    ///   FAILED record was persisted
    /// - `Ok(TransactionResult::Queued)` - connectivity was unavailable;
    ///   the action was durably queued and no record was persisted
    ///
    /// # Errors
    ///
    /// Precondition failures (`WalletNotConnected`, `ValidationError`,
    /// `TransactionInProgress`) are returned synchronously; no record is
    /// created and engine state is unchanged. Storage faults (including a
    /// full offline queue) also surface as errors, after resetting the
    /// engine to idle.
    pub async fn submit(&self, payload: ActionPayload) -> Result<TransactionResult, EngineError> {
        if !self.wallet.is_connected() {
            return Err(EngineError::WalletNotConnected);
        }
        payload.validate()?;

        let fee = self.fee_policy.fee_for(payload.action_type());
        let draft = {
            let mut state = self.lock_state();
            if state.pending {
                return Err(EngineError::TransactionInProgress);
            }
            let draft = TransactionRecord::draft(payload, fee);
            state.pending = true;
            state.current_transaction = Some(draft.clone());
            draft
        };

        // Subscribers observe the start before any await point
        let callbacks = self.lock_callbacks().clone();
        if let Some(on_start) = &callbacks.on_start {
            on_start(&draft);
        }
        info!(
            id = %draft.id,
            action = %draft.action_type(),
            fee = %draft.fee,
            "transaction started"
        );

        if !self.connectivity.is_online() {
            return self.queue_offline(draft, &callbacks);
        }

        let balance = self.wallet.balance();
        let settled = match tokio::time::timeout(
            self.config.settlement_timeout,
            self.settlement.settle(&draft, balance),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(EngineError::transport(format!(
                "settlement timed out after {:?}",
                self.config.settlement_timeout
            ))),
        };

        let mut record = draft;
        match settled {
            Ok(signature) => {
                record.mark_success(signature);
                self.persist(&record)?;
                self.reset_state(None);

                let result = TransactionResult::Settled(record);
                if let Some(on_success) = &callbacks.on_success {
                    on_success(&result);
                }
                if let Some(on_complete) = &callbacks.on_complete {
                    on_complete(&result);
                }
                info!(
                    id = %result.record().map(|r| r.id.as_str()).unwrap_or_default(),
                    "transaction settled"
                );
                Ok(result)
            }
            Err(err) => {
                record.mark_failed(err.to_string());
                self.persist(&record)?;
                self.reset_state(Some(err.to_string()));

                if let Some(on_error) = &callbacks.on_error {
                    on_error(&err);
                }
                let result = TransactionResult::Failed(record);
                if let Some(on_complete) = &callbacks.on_complete {
                    on_complete(&result);
                }
                warn!(error = %err, "transaction failed");
                Ok(result)
            }
        }
    }

    /// Queue an action whose submission could not reach settlement
    fn queue_offline(
        &self,
        draft: TransactionRecord,
        callbacks: &TransactionCallbacks,
    ) -> Result<TransactionResult, EngineError> {
        let id = match self.queue.enqueue(&draft.payload) {
            Ok(id) => id,
            Err(err) => {
                self.reset_state(Some(err.to_string()));
                return Err(err);
            }
        };
        self.reset_state(None);

        let result = TransactionResult::Queued(OfflineAction {
            id,
            payload: draft.payload,
            enqueued_at: Utc::now(),
        });
        if let Some(on_complete) = &callbacks.on_complete {
            on_complete(&result);
        }
        info!(queue_id = id, "offline, action queued for replay");
        Ok(result)
    }

    /// Abort any in-flight lifecycle at teardown
    ///
    /// The abandoned draft is persisted as FAILED with a `ShutdownAbort`
    /// reason rather than left dangling in PENDING state. A no-op when the
    /// engine is idle.
    pub fn shutdown(&self) -> Result<(), EngineError> {
        let draft = {
            let mut state = self.lock_state();
            state.pending = false;
            state.current_transaction.take()
        };

        if let Some(mut record) = draft {
            record.mark_failed(EngineError::ShutdownAbort.to_string());
            self.store.append(&record)?;
            self.lock_state().last_error = Some(EngineError::ShutdownAbort.to_string());
            warn!(id = %record.id, "in-flight transaction aborted by shutdown");
        }
        Ok(())
    }

    /// Read-only snapshot of the engine state
    ///
    /// Returns a clone; mutating the snapshot does not affect the engine.
    pub fn current_state(&self) -> EngineState {
        self.lock_state().clone()
    }

    /// Merge subscriber callbacks into the active set
    ///
    /// A later call naming an already-subscribed event replaces that
    /// handler; events not named keep their current handler.
    pub fn subscribe(&self, callbacks: TransactionCallbacks) {
        self.lock_callbacks().merge(callbacks);
    }

    /// The fee the policy assigns to an action type
    pub fn calculate_fee(&self, action: ActionType) -> Decimal {
        self.fee_policy.fee_for(action)
    }

    /// The fee split for a given amount
    pub fn fee_split(&self, amount: Decimal) -> FeeSplit {
        self.fee_policy.split_fee(amount)
    }

    /// Full transaction history, in insertion order
    pub fn transaction_history(&self) -> Result<Vec<TransactionRecord>, EngineError> {
        self.store.all()
    }

    /// Transaction history filtered by status
    pub fn transactions_by_status(
        &self,
        status: TransactionStatus,
    ) -> Result<Vec<TransactionRecord>, EngineError> {
        self.store.by_status(status)
    }

    /// Derived statistics over the history
    pub fn transaction_stats(&self) -> Result<TransactionStats, EngineError> {
        self.store.stats()
    }

    /// Erase the transaction history
    ///
    /// Destructive; intended only for an explicit user-initiated reset.
    pub fn clear_history(&self) -> Result<(), EngineError> {
        self.store.clear()
    }

    /// The durable offline queue backing this engine
    pub fn offline_queue(&self) -> &OfflineQueue {
        &self.queue
    }

    fn persist(&self, record: &TransactionRecord) -> Result<(), EngineError> {
        self.store.append(record).map_err(|err| {
            self.reset_state(Some(err.to_string()));
            err
        })
    }

    fn reset_state(&self, last_error: Option<String>) {
        let mut state = self.lock_state();
        state.pending = false;
        state.current_transaction = None;
        state.last_error = last_error;
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_callbacks(&self) -> MutexGuard<'_, TransactionCallbacks> {
        self.callbacks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
