use crate::domain::account::AccountSnapshot;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AccountRow<'a> {
    id: &'a str,
    balance: Decimal,
    failed_transfers: u64,
}

/// Writes final account state as CSV (`id,balance,failed_transfers`).
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes one row per account with balances normalized (`100.00` becomes `100`).
    pub fn write_accounts(&mut self, accounts: &[AccountSnapshot]) -> Result<()> {
        for account in accounts {
            self.writer.serialize(AccountRow {
                id: &account.id,
                balance: account.balance.value().normalize(),
                failed_transfers: account.failed_transfers,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
