//! Thin HTTP adapter over [`Ledger`] for the `serve` command.

pub mod error;
pub mod handlers;

use crate::application::ledger::Ledger;
use crate::config::ServerConfig;
use crate::error::Result;
use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

const SAMPLE_ACCOUNTS: [(&str, Decimal); 2] = [
    ("0ec8ab7c-5af2-11e9-8647-d663bd873d93", dec!(1000)),
    ("0ec8b1e4-5af2-11e9-8647-d663bd873d93", dec!(2000)),
];

pub fn router(ledger: Ledger) -> Router {
    Router::new()
        .route("/", get(handlers::forbidden))
        .route("/health", get(handlers::health))
        .route("/transfer", post(handlers::transfer))
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/accounts/{id}", get(handlers::get_account))
        .with_state(ledger)
}

/// Creates the two sample accounts offered by `serve --seed`.
pub async fn seed_sample_accounts(ledger: &Ledger) -> Result<()> {
    for (id, balance) in SAMPLE_ACCOUNTS {
        let account = ledger
            .create_account(Some(id.to_string()), Some(balance))
            .await?;
        info!(
            account = account.id(),
            %balance,
            created_at = %account.created_at(),
            "sample account created"
        );
    }
    Ok(())
}

/// Serves the ledger until Ctrl-C, seeding the sample accounts first if configured.
pub async fn serve(ledger: Ledger, config: &ServerConfig) -> Result<()> {
    if config.seed {
        seed_sample_accounts(&ledger).await?;
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, "server started");

    axum::serve(listener, router(ledger))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::domain::account::Balance;
    use crate::error::LedgerError;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use std::sync::Arc;

    fn ledger() -> Ledger {
        Ledger::new(
            Arc::new(InMemoryAccountStore::new()),
            &LedgerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_seed_sample_accounts() {
        let ledger = ledger();
        seed_sample_accounts(&ledger).await.unwrap();

        let accounts = ledger.accounts().await;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, "0ec8ab7c-5af2-11e9-8647-d663bd873d93");
        assert_eq!(accounts[0].balance, Balance::new(dec!(1000)));
        assert_eq!(accounts[1].balance, Balance::new(dec!(2000)));
    }

    #[tokio::test]
    async fn test_seeding_twice_reports_duplicate() {
        let ledger = ledger();
        seed_sample_accounts(&ledger).await.unwrap();

        assert!(matches!(
            seed_sample_accounts(&ledger).await,
            Err(LedgerError::DuplicateAccount(_))
        ));
    }

    #[tokio::test]
    async fn test_serve_seeds_before_binding() {
        let ledger = ledger();
        ledger
            .create_account(
                Some("0ec8ab7c-5af2-11e9-8647-d663bd873d93".to_string()),
                Some(dec!(1)),
            )
            .await
            .unwrap();
        let config = ServerConfig {
            seed: true,
            ..ServerConfig::default()
        };

        assert!(matches!(
            serve(ledger, &config).await,
            Err(LedgerError::DuplicateAccount(_))
        ));
    }
}
