use super::transfer::TransferService;
use crate::config::LedgerConfig;
use crate::domain::account::{Account, AccountSnapshot};
use crate::domain::ports::{AccountStore, AccountStoreRef};
use crate::domain::transfer::TransferOutcome;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Entry point used by request handlers.
///
/// `Ledger` owns the injected account store and the transfer service built on top of
/// it. It is cheap to clone; clones share the same accounts.
#[derive(Clone)]
pub struct Ledger {
    store: AccountStoreRef,
    transfers: Arc<TransferService>,
}

impl Ledger {
    /// Creates a new `Ledger` over `store`.
    ///
    /// # Arguments
    ///
    /// * `store` - The account registry shared with the transfer service.
    /// * `config` - Lock timeout and other ledger settings.
    pub fn new(store: AccountStoreRef, config: &LedgerConfig) -> Self {
        let transfers = TransferService::with_lock_timeout(store.clone(), config.lock_timeout);
        Self {
            store,
            transfers: Arc::new(transfers),
        }
    }

    pub fn store(&self) -> &AccountStoreRef {
        &self.store
    }

    pub async fn create_account(
        &self,
        id: Option<String>,
        balance: Option<Decimal>,
    ) -> Result<Arc<Account>> {
        self.store.create(id, balance).await
    }

    pub async fn get_account(&self, id: &str) -> Result<Arc<Account>> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    /// Resolves both ids and runs the transfer.
    ///
    /// Identical ids are rejected before either account is looked up.
    pub async fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<TransferOutcome> {
        if from == to {
            return Err(LedgerError::SameAccountTransfer);
        }
        let from = self.get_account(from).await?;
        let to = self.get_account(to).await?;
        self.transfers.transfer(&from, &to, amount).await
    }

    /// Snapshots of every account, ordered by id.
    pub async fn accounts(&self) -> Vec<AccountSnapshot> {
        let mut snapshots = Vec::new();
        for account in self.store.all().await {
            snapshots.push(account.snapshot().await);
        }
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }
}
