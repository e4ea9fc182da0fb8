use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to move `amount` from one account to another.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

/// How a transfer attempt ended when it did not fail outright.
///
/// A lock wait that runs out is an expected, retriable result rather than an error,
/// so it lives here instead of in `LedgerError`.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Completed,
    TimedOut { account: String },
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed)
    }
}
