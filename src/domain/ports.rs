use super::account::{Account, AccountGuard};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Registry of accounts and the only place balances are changed.
///
/// `withdraw` and `deposit` take a guard, so the caller must already hold the
/// account lock; implementations validate and mutate but never lock accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, id: Option<String>, balance: Option<Decimal>) -> Result<Arc<Account>>;
    async fn get(&self, id: &str) -> Option<Arc<Account>>;
    async fn withdraw(&self, guard: &mut AccountGuard<'_>, amount: Decimal) -> Result<()>;
    async fn deposit(&self, guard: &mut AccountGuard<'_>, amount: Decimal) -> Result<()>;
    async fn delete(&self, account: &Account) -> Result<()>;
    async fn clear(&self);
    async fn all(&self) -> Vec<Arc<Account>>;
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub type AccountStoreRef = Arc<dyn AccountStore>;
