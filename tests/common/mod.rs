#![allow(dead_code)]

use ledger_engine::application::ledger::Ledger;
use ledger_engine::config::LedgerConfig;
use ledger_engine::infrastructure::in_memory::InMemoryAccountStore;
use std::io::{Error, Write};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

pub fn ledger_with_timeout(lock_timeout: Duration) -> Ledger {
    Ledger::new(
        Arc::new(InMemoryAccountStore::new()),
        &LedgerConfig { lock_timeout },
    )
}

pub fn write_csv(header: &str, rows: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", header)?;
    for row in rows {
        writeln!(file, "{}", row)?;
    }
    file.flush()?;
    Ok(file)
}

/// Writes `count` transfers cycling between `accounts` in both directions.
pub fn generate_transfers(accounts: &[&str], count: usize) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file.as_file_mut());
    wtr.write_record(["from", "to", "amount"])?;

    for i in 0..count {
        let from = accounts[i % accounts.len()];
        let to = accounts[(i + 1) % accounts.len()];
        wtr.write_record([from, to, "1.0"])?;
    }

    wtr.flush()?;
    drop(wtr);
    Ok(file)
}
