//! Trip budget ledger.
//!
//! [`BudgetLedger`] holds the total budget, the running spend, and the
//! expense history, and enforces a two-phase delete:
//!
//! ```text
//! Idle --request_delete(i)--> PendingDelete(i)
//! PendingDelete(i) --confirm_delete--> Idle   (history[i] removed)
//! PendingDelete(i) --cancel_delete---> Idle   (no change)
//! ```
//!
//! `used` always equals the sum of the history amounts. [`LedgerService`]
//! wraps a ledger with a mutex and a [`LedgerStore`] and persists after
//! every mutation.

pub mod service;
pub mod store;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use service::{DEFAULT_LEDGER_KEY, LedgerService};
pub use store::{LedgerStore, MemoryLedgerStore, StoreError};

/// Category used when an expense is added with a blank category.
pub const DEFAULT_CATEGORY: &str = "未分類";

/// Category given to expenses read from a receipt.
pub const RECEIPT_CATEGORY: &str = "レシート読み取り";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One recorded expense. Amounts are whole yen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category: String,
    pub amount: u64,
}

/// The persisted part of a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerState {
    pub total_budget: u64,
    pub used: u64,
    pub history: Vec<Expense>,
}

impl LedgerState {
    /// Sum of all expense amounts in the history.
    pub fn history_total(&self) -> u64 {
        self.history
            .iter()
            .fold(0u64, |total, e| total.saturating_add(e.amount))
    }

    /// Share of the budget spent, in percent, saturating at 100.
    ///
    /// Zero when no budget is set.
    pub fn percent_used(&self) -> f64 {
        if self.total_budget == 0 {
            return 0.0;
        }
        (self.used as f64 * 100.0 / self.total_budget as f64).min(100.0)
    }

    /// `"¥used / ¥total"` with thousands separators.
    pub fn summary(&self) -> String {
        format!(
            "{} / {}",
            format_yen(self.used),
            format_yen(self.total_budget)
        )
    }
}

/// Delete-confirmation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePhase {
    #[default]
    Idle,
    /// A delete of `history[index]` awaits confirmation.
    PendingDelete(usize),
}

/// Rejected ledger operations. A rejected operation leaves the ledger
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("amount must be a positive number")]
    NonPositiveAmount,

    #[error("amount {0} would overflow the recorded spend")]
    AmountTooLarge(u64),

    #[error("amount unreadable from receipt text {0:?}")]
    UnreadableAmount(String),

    #[error("no expense at index {index} (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("a delete of entry {0} is already awaiting confirmation")]
    DeletePending(usize),

    #[error("no delete is awaiting confirmation")]
    NoPendingDelete,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// In-memory ledger with the two-phase delete state machine.
///
/// This type does no I/O; see [`LedgerService`] for the persisted version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetLedger {
    state: LedgerState,
    phase: DeletePhase,
}

impl BudgetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted state, in the `Idle` phase.
    ///
    /// If the stored `used` disagrees with the history, it is recomputed
    /// from the history.
    pub fn from_state(mut state: LedgerState) -> Self {
        let total = state.history_total();
        if state.used != total {
            warn!(
                stored = state.used,
                recomputed = total,
                "ledger spend disagrees with history, using history total"
            );
            state.used = total;
        }
        Self {
            state,
            phase: DeletePhase::Idle,
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn phase(&self) -> DeletePhase {
        self.phase
    }

    pub fn percent_used(&self) -> f64 {
        self.state.percent_used()
    }

    /// Overwrite the total budget. Spend and history are untouched.
    pub fn set_budget(&mut self, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::NonPositiveAmount);
        }
        self.state.total_budget = amount;
        Ok(())
    }

    /// Record an expense at `at`. A blank category becomes
    /// [`DEFAULT_CATEGORY`].
    pub fn add_expense(
        &mut self,
        amount: u64,
        category: &str,
        at: NaiveDateTime,
    ) -> Result<&Expense, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::NonPositiveAmount);
        }
        let used = self
            .state
            .used
            .checked_add(amount)
            .ok_or(LedgerError::AmountTooLarge(amount))?;
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        self.state.used = used;
        self.state.history.push(Expense {
            date: at.date(),
            time: at.time(),
            category: category.to_string(),
            amount,
        });
        Ok(&self.state.history[self.state.history.len() - 1])
    }

    /// Parse a receipt's OCR text and record it under [`RECEIPT_CATEGORY`].
    pub fn ingest_receipt_amount(
        &mut self,
        raw_text: &str,
        at: NaiveDateTime,
    ) -> Result<&Expense, LedgerError> {
        let amount = parse_receipt_amount(raw_text)
            .ok_or_else(|| LedgerError::UnreadableAmount(raw_text.to_string()))?;
        self.add_expense(amount, RECEIPT_CATEGORY, at)
    }

    /// Start deleting `history[index]`. Nothing changes until
    /// [`Self::confirm_delete`].
    pub fn request_delete(&mut self, index: usize) -> Result<&Expense, LedgerError> {
        if let DeletePhase::PendingDelete(pending) = self.phase {
            return Err(LedgerError::DeletePending(pending));
        }
        let len = self.state.history.len();
        let expense = self
            .state
            .history
            .get(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        self.phase = DeletePhase::PendingDelete(index);
        Ok(expense)
    }

    /// Remove the pending entry and return it.
    pub fn confirm_delete(&mut self) -> Result<Expense, LedgerError> {
        let DeletePhase::PendingDelete(index) = self.phase else {
            return Err(LedgerError::NoPendingDelete);
        };
        self.phase = DeletePhase::Idle;
        let len = self.state.history.len();
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }
        let removed = self.state.history.remove(index);
        self.state.used = self.state.used.saturating_sub(removed.amount);
        Ok(removed)
    }

    /// Abandon the pending delete.
    pub fn cancel_delete(&mut self) -> Result<(), LedgerError> {
        match self.phase {
            DeletePhase::PendingDelete(_) => {
                self.phase = DeletePhase::Idle;
                Ok(())
            }
            DeletePhase::Idle => Err(LedgerError::NoPendingDelete),
        }
    }

    /// Clear budget, spend, and history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract an amount from free-form receipt text by keeping only ASCII
/// digits.
///
/// Returns `None` when no digits remain, the digits are all zero, or the
/// number does not fit in a `u64`.
pub fn parse_receipt_amount(raw_text: &str) -> Option<u64> {
    let digits: String = raw_text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok().filter(|&amount| amount > 0)
}

/// Format whole yen with a leading `¥` and comma thousands separators.
pub fn format_yen(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('¥');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
