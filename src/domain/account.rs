use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::Sub;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// A monetary value held by an account.
///
/// Wraps `rust_decimal::Decimal` so balances and transfer amounts cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// A strictly positive amount moved by a withdraw or deposit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value < Decimal::ZERO {
            Err(LedgerError::NegativeAmount)
        } else if value == Decimal::ZERO {
            Err(LedgerError::ZeroAmount)
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Adds `rhs`, or `None` if the result does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[derive(Debug)]
struct AccountState {
    balance: Balance,
    modified_at: DateTime<Utc>,
}

/// A balance-holding account shared by every holder through `Arc<Account>`.
///
/// Balance and modification time sit behind the account's own lock and can only be
/// read or changed through an [`AccountGuard`]. The failed-transfer counter is atomic
/// and is bumped without holding the lock.
///
/// Two accounts are equal when their id and creation time match; the balance is not
/// part of identity.
#[derive(Debug)]
pub struct Account {
    id: String,
    created_at: DateTime<Utc>,
    state: Mutex<AccountState>,
    failed_transfers: AtomicU64,
}

impl Account {
    pub(crate) fn new(id: String, balance: Balance) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            state: Mutex::new(AccountState {
                balance,
                modified_at: now,
            }),
            failed_transfers: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Waits until the account lock is free and takes it.
    pub async fn lock(&self) -> AccountGuard<'_> {
        AccountGuard {
            account: self,
            state: self.state.lock().await,
        }
    }

    /// Takes the account lock, giving up after `timeout`.
    pub async fn try_lock_for(&self, timeout: Duration) -> Option<AccountGuard<'_>> {
        tokio::time::timeout(timeout, self.lock()).await.ok()
    }

    pub async fn balance(&self) -> Balance {
        self.lock().await.balance()
    }

    pub async fn modified_at(&self) -> DateTime<Utc> {
        self.lock().await.modified_at()
    }

    pub fn failed_transfer_count(&self) -> u64 {
        self.failed_transfers.load(Ordering::Relaxed)
    }

    pub(crate) fn record_failed_transfer(&self) {
        self.failed_transfers.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current state out under the account lock.
    pub async fn snapshot(&self) -> AccountSnapshot {
        let guard = self.lock().await;
        AccountSnapshot {
            id: self.id.clone(),
            balance: guard.balance(),
            created_at: self.created_at,
            modified_at: guard.modified_at(),
            failed_transfers: self.failed_transfer_count(),
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.created_at == other.created_at
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.created_at.hash(state);
    }
}

/// Exclusive access to one account's balance, released on drop.
pub struct AccountGuard<'a> {
    account: &'a Account,
    state: MutexGuard<'a, AccountState>,
}

impl<'a> AccountGuard<'a> {
    pub fn account(&self) -> &'a Account {
        self.account
    }

    pub fn balance(&self) -> Balance {
        self.state.balance
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.state.modified_at
    }

    /// Replaces the balance and stamps the modification time.
    pub(crate) fn commit(&mut self, balance: Balance) {
        self.state.balance = balance;
        self.state.modified_at = Utc::now();
    }
}

/// Point-in-time view of an account, used for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: String,
    pub balance: Balance,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub failed_transfers: u64,
}
