//! Batch driver behind the `replay` command.
//!
//! Accounts are loaded first, then every transfer row is submitted as its own task so
//! the ledger sees real contention. A timed-out transfer is resubmitted here, on the
//! caller side, with a short random backoff.

use super::csv::AccountRecord;
use super::csv::reader::CsvRecordReader;
use crate::application::ledger::Ledger;
use crate::config::ReplayConfig;
use crate::domain::transfer::{TransferOutcome, TransferRequest};
use crate::error::Result;
use rand::Rng;
use std::io::Read;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
}

/// Creates every account listed in `source`, skipping rows that cannot be read or created.
pub async fn load_accounts<R: Read>(ledger: &Ledger, source: R) -> usize {
    let mut created = 0;
    for record in CsvRecordReader::new(source).records::<AccountRecord>() {
        match record {
            Ok(record) => match ledger.create_account(record.id, record.balance).await {
                Ok(_) => created += 1,
                Err(e) => warn!("Error creating account: {}", e),
            },
            Err(e) => warn!("Error reading account: {}", e),
        }
    }
    info!(created, "accounts loaded");
    created
}

/// Submits every transfer in `source` concurrently and waits for all of them.
pub async fn replay_transfers<R: Read>(
    ledger: &Ledger,
    source: R,
    config: &ReplayConfig,
) -> ReplaySummary {
    let mut tasks = JoinSet::new();
    for request in CsvRecordReader::new(source).records::<TransferRequest>() {
        match request {
            Ok(request) => {
                tasks.spawn(submit(ledger.clone(), request, config.max_retries));
            }
            Err(e) => warn!("Error reading transfer: {}", e),
        }
    }

    let mut summary = ReplaySummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(TransferOutcome::Completed)) => summary.completed += 1,
            Ok(Ok(TransferOutcome::TimedOut { account })) => {
                warn!(account = %account, "transfer abandoned after lock timeouts");
                summary.timed_out += 1;
            }
            Ok(Err(e)) => {
                warn!("Error processing transfer: {}", e);
                summary.failed += 1;
            }
            Err(e) => {
                error!("transfer task aborted: {}", e);
                summary.failed += 1;
            }
        }
    }

    info!(
        completed = summary.completed,
        timed_out = summary.timed_out,
        failed = summary.failed,
        "replay finished"
    );
    summary
}

async fn submit(
    ledger: Ledger,
    request: TransferRequest,
    max_retries: u32,
) -> Result<TransferOutcome> {
    let mut attempt = 0;
    loop {
        let outcome = ledger
            .transfer(&request.from, &request.to, request.amount)
            .await?;
        if outcome.is_completed() || attempt >= max_retries {
            return Ok(outcome);
        }
        attempt += 1;
        let backoff = rand::thread_rng().gen_range(1..=50);
        tokio::time::sleep(Duration::from_millis(backoff)).await;
    }
}
