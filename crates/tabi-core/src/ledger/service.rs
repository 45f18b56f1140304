//! Persisted, serialized access to a [`BudgetLedger`].
//!
//! Every operation runs under one mutex, so no two mutations interleave.
//! Each successful mutation is saved before the lock is released; a failed
//! save is logged and the in-memory state stays authoritative until the next
//! successful save.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::store::{LedgerStore, StoreError};
use super::{BudgetLedger, DeletePhase, Expense, LedgerError, LedgerState};

/// Storage key used when none is given.
pub const DEFAULT_LEDGER_KEY: &str = "budget";

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// A [`BudgetLedger`] bound to a [`LedgerStore`].
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    key: String,
    ledger: Mutex<BudgetLedger>,
    clock: Clock,
}

impl LedgerService {
    /// Load the ledger stored under `key`, or start from zero if none.
    ///
    /// A store that fails to load is an error: starting empty would
    /// overwrite the stored history on the next save.
    pub fn open(store: Arc<dyn LedgerStore>, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let ledger = match store.load(&key)? {
            Some(state) => BudgetLedger::from_state(state),
            None => BudgetLedger::new(),
        };
        Ok(Self {
            store,
            key,
            ledger: Mutex::new(ledger),
            clock: Box::new(|| Local::now().naive_local()),
        })
    }

    /// Replace the timestamp source used for new expenses.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> LedgerState {
        self.lock().state().clone()
    }

    pub fn phase(&self) -> DeletePhase {
        self.lock().phase()
    }

    pub fn percent_used(&self) -> f64 {
        self.lock().percent_used()
    }

    pub fn set_budget(&self, amount: u64) -> Result<(), LedgerError> {
        let mut ledger = self.lock();
        ledger.set_budget(amount)?;
        info!(total_budget = amount, "budget set");
        self.persist(&ledger);
        Ok(())
    }

    pub fn add_expense(&self, amount: u64, category: &str) -> Result<Expense, LedgerError> {
        let mut ledger = self.lock();
        let expense = ledger.add_expense(amount, category, (self.clock)())?.clone();
        info!(amount, category = %expense.category, used = ledger.state().used, "expense added");
        self.persist(&ledger);
        Ok(expense)
    }

    pub fn ingest_receipt_amount(&self, raw_text: &str) -> Result<Expense, LedgerError> {
        let mut ledger = self.lock();
        let expense = ledger
            .ingest_receipt_amount(raw_text, (self.clock)())?
            .clone();
        info!(amount = expense.amount, used = ledger.state().used, "receipt expense added");
        self.persist(&ledger);
        Ok(expense)
    }

    /// Begin a delete. Returns the entry awaiting confirmation.
    pub fn request_delete(&self, index: usize) -> Result<Expense, LedgerError> {
        let mut ledger = self.lock();
        let expense = ledger.request_delete(index)?.clone();
        Ok(expense)
    }

    pub fn confirm_delete(&self) -> Result<Expense, LedgerError> {
        let mut ledger = self.lock();
        let removed = ledger.confirm_delete()?;
        info!(amount = removed.amount, used = ledger.state().used, "expense deleted");
        self.persist(&ledger);
        Ok(removed)
    }

    pub fn cancel_delete(&self) -> Result<(), LedgerError> {
        self.lock().cancel_delete()
    }

    /// Clear the ledger and persist the empty state.
    pub fn reset(&self) {
        let mut ledger = self.lock();
        ledger.reset();
        info!("ledger reset");
        self.persist(&ledger);
    }

    /// Save the current state, reporting failure to the caller.
    pub fn flush(&self) -> Result<(), StoreError> {
        let ledger = self.lock();
        self.store.save(&self.key, ledger.state())
    }

    fn lock(&self) -> MutexGuard<'_, BudgetLedger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, ledger: &BudgetLedger) {
        if let Err(e) = self.store.save(&self.key, ledger.state()) {
            warn!(key = %self.key, error = %e, "failed to save ledger, keeping in-memory state");
        }
    }
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService")
            .field("key", &self.key)
            .field("ledger", &*self.lock())
            .finish()
    }
}
