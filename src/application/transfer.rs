use crate::domain::account::Account;
use crate::domain::ports::{AccountStore, AccountStoreRef};
use crate::domain::transfer::TransferOutcome;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{error, info, warn};

/// How long a transfer waits for each account lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Moves money between two accounts without a global lock.
///
/// The sender's lock is taken first and the receiver's second, each with a bounded
/// wait. There is no ordering by id: two opposite transfers over the same pair can
/// each hold one lock and wait for the other, in which case the bounded wait turns
/// the stall into a [`TransferOutcome::TimedOut`] that the caller may retry.
pub struct TransferService {
    store: AccountStoreRef,
    lock_timeout: Duration,
}

impl TransferService {
    pub fn new(store: AccountStoreRef) -> Self {
        Self::with_lock_timeout(store, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(store: AccountStoreRef, lock_timeout: Duration) -> Self {
        Self {
            store,
            lock_timeout,
        }
    }

    /// Executes a transfer of `amount` from `from` to `to`.
    ///
    /// Both locks are held while the withdraw and deposit run, so no observer sees
    /// money that has left one account without reaching the other. Guards are
    /// released receiver first on every exit path.
    pub async fn transfer(
        &self,
        from: &Account,
        to: &Account,
        amount: Decimal,
    ) -> Result<TransferOutcome> {
        if from.id() == to.id() {
            return Err(LedgerError::SameAccountTransfer);
        }

        let Some(mut from_guard) = from.try_lock_for(self.lock_timeout).await else {
            from.record_failed_transfer();
            warn!(account = from.id(), "timed out waiting for sender lock");
            return Ok(TransferOutcome::TimedOut {
                account: from.id().to_string(),
            });
        };

        // The amount itself is validated later, by withdraw. A zero or negative amount
        // still waits for the receiver lock and may time out there first.
        if from_guard.balance().value() < amount {
            from.record_failed_transfer();
            return Err(LedgerError::InsufficientFunds(from.id().to_string()));
        }

        let Some(mut to_guard) = to.try_lock_for(self.lock_timeout).await else {
            to.record_failed_transfer();
            warn!(account = to.id(), "timed out waiting for receiver lock");
            return Ok(TransferOutcome::TimedOut {
                account: to.id().to_string(),
            });
        };

        if to_guard.balance().value().checked_add(amount).is_none() {
            return Err(LedgerError::BalanceOverflow(to.id().to_string()));
        }

        self.store.withdraw(&mut from_guard, amount).await?;
        if let Err(err) = self.store.deposit(&mut to_guard, amount).await {
            // Put the money back while both locks are still held.
            if let Err(refund_err) = self.store.deposit(&mut from_guard, amount).await {
                error!(
                    account = from.id(),
                    %amount,
                    error = %refund_err,
                    "failed to refund sender after rejected deposit"
                );
            }
            return Err(err);
        }

        drop(to_guard);
        drop(from_guard);

        info!(from = from.id(), to = to.id(), %amount, "transfer completed");
        Ok(TransferOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    const SHORT_TIMEOUT: Duration = Duration::from_millis(50);

    async fn setup(from: Decimal, to: Decimal) -> (TransferService, Arc<Account>, Arc<Account>) {
        let store: AccountStoreRef = Arc::new(InMemoryAccountStore::new());
        let a = store
            .create(Some("A".to_string()), Some(from))
            .await
            .unwrap();
        let b = store.create(Some("B".to_string()), Some(to)).await.unwrap();
        (
            TransferService::with_lock_timeout(store, SHORT_TIMEOUT),
            a,
            b,
        )
    }

    #[tokio::test]
    async fn test_transfer_moves_exact_amount() {
        let (service, a, b) = setup(dec!(100), dec!(50)).await;

        let outcome = service.transfer(&a, &b, dec!(30.25)).await.unwrap();

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(a.balance().await, Balance::new(dec!(69.75)));
        assert_eq!(b.balance().await, Balance::new(dec!(80.25)));
        assert_eq!(a.failed_transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_same_account_rejected_without_locking() {
        let (service, a, _) = setup(dec!(100), dec!(0)).await;
        let _held = a.lock().await;

        let result = service.transfer(&a, &a, dec!(1)).await;

        assert!(matches!(result, Err(LedgerError::SameAccountTransfer)));
        assert_eq!(a.failed_transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_and_negative_amounts_leave_balances_unchanged() {
        let (service, a, b) = setup(dec!(100), dec!(50)).await;

        assert!(matches!(
            service.transfer(&a, &b, dec!(0)).await,
            Err(LedgerError::ZeroAmount)
        ));
        assert!(matches!(
            service.transfer(&a, &b, dec!(-5)).await,
            Err(LedgerError::NegativeAmount)
        ));

        assert_eq!(a.balance().await, Balance::new(dec!(100)));
        assert_eq!(b.balance().await, Balance::new(dec!(50)));
    }

    #[tokio::test]
    async fn test_insufficient_funds_counts_against_sender() {
        let (service, a, b) = setup(dec!(10), dec!(0)).await;

        let result = service.transfer(&a, &b, dec!(10.01)).await;

        assert!(matches!(result, Err(LedgerError::InsufficientFunds(id)) if id == "A"));
        assert_eq!(a.failed_transfer_count(), 1);
        assert_eq!(b.failed_transfer_count(), 0);
        assert_eq!(a.balance().await, Balance::new(dec!(10)));
        assert_eq!(b.balance().await, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_sender_lock_timeout() {
        let (service, a, b) = setup(dec!(10), dec!(0)).await;
        let held = a.lock().await;

        let outcome = service.transfer(&a, &b, dec!(1)).await.unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::TimedOut {
                account: "A".to_string()
            }
        );
        assert_eq!(a.failed_transfer_count(), 1);
        assert_eq!(held.balance(), Balance::new(dec!(10)));
        drop(held);
        assert_eq!(b.balance().await, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_receiver_lock_timeout_releases_sender() {
        let (service, a, b) = setup(dec!(10), dec!(0)).await;
        let held = b.lock().await;

        let outcome = service.transfer(&a, &b, dec!(1)).await.unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::TimedOut {
                account: "B".to_string()
            }
        );
        assert_eq!(b.failed_transfer_count(), 1);
        assert_eq!(a.failed_transfer_count(), 0);
        assert!(a.try_lock_for(SHORT_TIMEOUT).await.is_some());
        drop(held);
        assert_eq!(a.balance().await, Balance::new(dec!(10)));
        assert_eq!(b.balance().await, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_receiver_overflow_leaves_both_balances_unchanged() {
        let (service, a, b) = setup(dec!(10), Decimal::MAX).await;

        let result = service.transfer(&a, &b, dec!(1)).await;

        assert!(matches!(result, Err(LedgerError::BalanceOverflow(id)) if id == "B"));
        assert_eq!(a.balance().await, Balance::new(dec!(10)));
        assert_eq!(b.balance().await, Balance::new(Decimal::MAX));
        assert_eq!(a.failed_transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_waits_for_receiver_lock() {
        let (service, a, b) = setup(dec!(10), dec!(0)).await;
        let held = b.lock().await;

        let outcome = service.transfer(&a, &b, dec!(0)).await.unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::TimedOut {
                account: "B".to_string()
            }
        );
        assert_eq!(b.failed_transfer_count(), 1);
        drop(held);
        assert!(matches!(
            service.transfer(&a, &b, dec!(0)).await,
            Err(LedgerError::ZeroAmount)
        ));
    }

    #[tokio::test]
    async fn test_rejected_deposit_refunds_sender() {
        let store = Arc::new(InMemoryAccountStore::new());
        let a = store.create(None, Some(dec!(10))).await.unwrap();
        let b = store.create(None, Some(dec!(0))).await.unwrap();
        store.delete(&b).await.unwrap();
        let service = TransferService::with_lock_timeout(store, SHORT_TIMEOUT);

        let result = service.transfer(&a, &b, dec!(4)).await;

        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
        assert_eq!(a.balance().await, Balance::new(dec!(10)));
        assert_eq!(b.balance().await, Balance::ZERO);
    }
}
