//! Collaborators that feed the analytics engine
//!
//! The engine only needs two capabilities: a ledger snapshot for a scope and
//! the budget limits for that scope. [`crate::db::Database`] implements both
//! on SQLite; [`InMemoryLedger`] implements both over plain vectors for
//! fixtures and embedding.

use crate::error::Result;
use crate::models::{BudgetLimits, Transaction, UserScope};

/// Source of transaction records
pub trait LedgerStore {
    /// Snapshot of the records visible to `scope`
    fn fetch_transactions(&self, scope: &UserScope) -> Result<Vec<Transaction>>;
}

/// Source of per-category budget limits
pub trait BudgetLimitSource {
    /// Limits configured for `scope`, in the order they were defined
    fn limits_for(&self, scope: &UserScope) -> Result<BudgetLimits>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    fn fetch_transactions(&self, scope: &UserScope) -> Result<Vec<Transaction>> {
        (**self).fetch_transactions(scope)
    }
}

impl<T: BudgetLimitSource + ?Sized> BudgetLimitSource for &T {
    fn limits_for(&self, scope: &UserScope) -> Result<BudgetLimits> {
        (**self).limits_for(scope)
    }
}

/// Ledger held in memory, with optional per-record owners
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    transactions: Vec<(Option<String>, Transaction)>,
    limits: Vec<(Option<String>, BudgetLimits)>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger of unowned records with no limits
    pub fn from_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            transactions: transactions.into_iter().map(|t| (None, t)).collect(),
            limits: Vec::new(),
        }
    }

    pub fn push(&mut self, owner: Option<&str>, transaction: Transaction) {
        self.transactions
            .push((owner.map(str::to_string), transaction));
    }

    /// Limits visible to `owner` (`None` = limits used for the all-data scope)
    pub fn set_limits(&mut self, owner: Option<&str>, limits: BudgetLimits) {
        let owner = owner.map(str::to_string);
        match self.limits.iter_mut().find(|(o, _)| *o == owner) {
            Some((_, existing)) => *existing = limits,
            None => self.limits.push((owner, limits)),
        }
    }
}

impl LedgerStore for InMemoryLedger {
    fn fetch_transactions(&self, scope: &UserScope) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|(owner, _)| match scope {
                UserScope::All => true,
                UserScope::Owner(name) => owner.as_deref() == Some(name.as_str()),
            })
            .map(|(_, t)| t.clone())
            .collect())
    }
}

impl BudgetLimitSource for InMemoryLedger {
    fn limits_for(&self, scope: &UserScope) -> Result<BudgetLimits> {
        let owner = scope.owner();
        Ok(self
            .limits
            .iter()
            .find(|(o, _)| o.as_deref() == owner)
            .map(|(_, limits)| limits.clone())
            .unwrap_or_default())
    }
}
