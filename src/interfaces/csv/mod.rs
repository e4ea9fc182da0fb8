//! CSV input and output for the `replay` command.

pub mod account_writer;
pub mod reader;

use rust_decimal::Decimal;
use serde::Deserialize;

/// One row of an accounts file. A blank id asks the store to generate one.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct AccountRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
}
