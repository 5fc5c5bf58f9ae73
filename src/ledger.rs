use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::ConduitError;
use crate::traits::Accounts;

/// An in-memory balance store shared between threads.
///
/// One reader/writer lock covers every account: writes serialize globally,
/// reads (`query`, `len`, `snapshot`) may run together. Accounts are opened
/// by their first deposit and live as long as the ledger.
///
/// # Example
///
/// ```rust
/// use conduit::Ledger;
///
/// let ledger = Ledger::new();
/// ledger.deposit("alice", 5);
/// ledger.deposit("alice", 3);
/// assert_eq!(ledger.withdraw("alice", 100), 8);
/// assert_eq!(ledger.query("alice"), 0);
/// ```
#[derive(Default)]
pub struct Ledger {
    balances: RwLock<HashMap<String, u64>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `name`, opening the account at 0 if it is absent.
    /// Saturates at `u64::MAX`.
    pub fn deposit(&self, name: &str, amount: u64) {
        let mut balances = self.balances.write();
        credit(&mut balances, name, amount);
    }

    /// Debit up to `amount` and return what was taken. Never overdraws;
    /// unknown accounts yield 0.
    pub fn withdraw(&self, name: &str, amount: u64) -> u64 {
        let mut balances = self.balances.write();
        debit_clamped(&mut balances, name, amount)
    }

    /// Debit exactly `amount` or nothing.
    ///
    /// # Errors
    ///
    /// [`ConduitError::UnknownAccount`] if `name` was never funded,
    /// [`ConduitError::InsufficientFunds`] if the balance is short. The
    /// balance is untouched in both cases.
    pub fn try_withdraw(&self, name: &str, amount: u64) -> Result<u64, ConduitError> {
        let mut balances = self.balances.write();
        debit_exact(&mut balances, name, amount)
    }

    /// Current balance of `name`, or 0 if absent.
    pub fn query(&self, name: &str) -> u64 {
        self.balances.read().get(name).copied().unwrap_or(0)
    }

    /// Number of open accounts.
    pub fn len(&self) -> usize {
        self.balances.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.read().is_empty()
    }

    /// All accounts and balances, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut all: Vec<_> = self
            .balances
            .read()
            .iter()
            .map(|(name, balance)| (name.clone(), *balance))
            .collect();
        all.sort();
        all
    }
}

impl Accounts for Ledger {
    fn deposit(&self, name: &str, amount: u64) {
        Ledger::deposit(self, name, amount)
    }

    fn withdraw(&self, name: &str, amount: u64) -> u64 {
        Ledger::withdraw(self, name, amount)
    }

    fn query(&self, name: &str) -> u64 {
        Ledger::query(self, name)
    }
}

// ---------------------------------------------------------------------------
// Balance arithmetic, shared with the actor
// ---------------------------------------------------------------------------

pub(crate) fn credit(balances: &mut HashMap<String, u64>, name: &str, amount: u64) {
    match balances.get_mut(name) {
        Some(balance) => *balance = balance.saturating_add(amount),
        None => {
            log::debug!("opening account '{name}'");
            balances.insert(name.to_owned(), amount);
        }
    }
}

pub(crate) fn debit_clamped(balances: &mut HashMap<String, u64>, name: &str, amount: u64) -> u64 {
    let Some(balance) = balances.get_mut(name) else {
        return 0;
    };
    let taken = amount.min(*balance);
    *balance -= taken;
    taken
}

pub(crate) fn debit_exact(
    balances: &mut HashMap<String, u64>,
    name: &str,
    amount: u64,
) -> Result<u64, ConduitError> {
    let balance = balances
        .get_mut(name)
        .ok_or_else(|| ConduitError::UnknownAccount(name.to_owned()))?;
    if *balance < amount {
        return Err(ConduitError::InsufficientFunds {
            account:   name.to_owned(),
            requested: amount,
            available: *balance,
        });
    }
    *balance -= amount;
    Ok(amount)
}
