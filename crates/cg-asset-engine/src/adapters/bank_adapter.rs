//! # Bank Adapter
//!
//! In-memory [`ValueTransfer`] implementation for testing. Production
//! deployments delegate to the ledger's native transfer primitive.

use crate::domain::value_objects::AccountId;
use crate::errors::TransferError;
use crate::ports::outbound::ValueTransfer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory account balances with atomic transfers.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    // Single lock so debit and credit commit together.
    balances: Mutex<HashMap<AccountId, u64>>,
}

impl InMemoryBank {
    /// Creates a bank with no funded accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an account balance.
    pub fn set_balance(&self, account: AccountId, balance: u64) {
        self.balances.lock().unwrap().insert(account, balance);
    }

    /// Returns an account balance (zero if never funded).
    #[must_use]
    pub fn balance(&self, account: AccountId) -> u64 {
        self.balances
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ValueTransfer for InMemoryBank {
    async fn transfer(
        &self,
        amount: u64,
        from: AccountId,
        to: AccountId,
    ) -> Result<(), TransferError> {
        let mut balances = self.balances.lock().unwrap();

        let available = balances.get(&from).copied().unwrap_or(0);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                required: amount,
                available,
            })?;

        balances.insert(from, remaining);
        let credited = balances.get(&to).copied().unwrap_or(0).saturating_add(amount);
        balances.insert(to, credited);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
