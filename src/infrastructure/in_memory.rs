use crate::domain::account::{Account, AccountGuard, Amount, Balance};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A thread-safe in-memory account registry.
///
/// Uses `Arc<RwLock<HashMap<String, Arc<Account>>>>` so clones share the same accounts.
/// Accounts are handed out as `Arc<Account>` and never copied.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Arc<Account>>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails unless `account` is the very instance registered under its id.
    async fn ensure_registered(&self, account: &Account) -> Result<()> {
        let accounts = self.accounts.read().await;
        match accounts.get(account.id()) {
            Some(stored) if **stored == *account => Ok(()),
            _ => Err(LedgerError::AccountNotFound(account.id().to_string())),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, id: Option<String>, balance: Option<Decimal>) -> Result<Arc<Account>> {
        let balance = balance
            .ok_or_else(|| LedgerError::InvalidArgument("balance is required".to_string()))?;
        if balance < Decimal::ZERO {
            return Err(LedgerError::InvalidArgument(
                "initial balance must not be negative".to_string(),
            ));
        }

        if id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(LedgerError::InvalidArgument(
                "account id must not be empty".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().await;
        let account = match id {
            Some(id) => match accounts.entry(id) {
                Entry::Occupied(entry) => {
                    return Err(LedgerError::DuplicateAccount(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    let account = Arc::new(Account::new(entry.key().clone(), Balance(balance)));
                    entry.insert(account.clone());
                    account
                }
            },
            None => loop {
                if let Entry::Vacant(entry) = accounts.entry(Uuid::new_v4().to_string()) {
                    let account = Arc::new(Account::new(entry.key().clone(), Balance(balance)));
                    entry.insert(account.clone());
                    break account;
                }
            },
        };

        debug!(account = account.id(), %balance, "account created");
        Ok(account)
    }

    async fn get(&self, id: &str) -> Option<Arc<Account>> {
        let accounts = self.accounts.read().await;
        accounts.get(id).cloned()
    }

    async fn withdraw(&self, guard: &mut AccountGuard<'_>, amount: Decimal) -> Result<()> {
        let amount = Amount::new(amount)?;
        let account = guard.account();
        self.ensure_registered(account).await?;

        let remaining = guard.balance() - Balance::from(amount);
        if remaining.is_negative() {
            return Err(LedgerError::InsufficientFunds(account.id().to_string()));
        }
        guard.commit(remaining);

        debug!(account = account.id(), amount = %amount.value(), "withdrawn");
        Ok(())
    }

    async fn deposit(&self, guard: &mut AccountGuard<'_>, amount: Decimal) -> Result<()> {
        let amount = Amount::new(amount)?;
        let account = guard.account();
        self.ensure_registered(account).await?;

        let updated = guard
            .balance()
            .checked_add(amount.into())
            .ok_or_else(|| LedgerError::BalanceOverflow(account.id().to_string()))?;
        guard.commit(updated);

        debug!(account = account.id(), amount = %amount.value(), "deposited");
        Ok(())
    }

    async fn delete(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let registered = matches!(accounts.get(account.id()), Some(stored) if **stored == *account);
        if !registered {
            return Err(LedgerError::AccountNotFound(account.id().to_string()));
        }
        accounts.remove(account.id());
        debug!(account = account.id(), "account deleted");
        Ok(())
    }

    async fn clear(&self) {
        let mut accounts = self.accounts.write().await;
        accounts.clear();
    }

    async fn all(&self) -> Vec<Arc<Account>> {
        let accounts = self.accounts.read().await;
        accounts.values().cloned().collect()
    }

    async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }
}
