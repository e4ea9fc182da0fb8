use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Diagnostic, Debug)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(code(ledger::invalid_argument))]
    InvalidArgument(String),

    #[error("Amount must not be negative")]
    #[diagnostic(code(ledger::negative_amount))]
    NegativeAmount,

    #[error("Amount must not be zero")]
    #[diagnostic(code(ledger::zero_amount))]
    ZeroAmount,

    #[error("Account '{0}' not found")]
    #[diagnostic(code(ledger::account_not_found))]
    AccountNotFound(String),

    #[error("Account '{0}' already exists")]
    #[diagnostic(code(ledger::duplicate_account))]
    DuplicateAccount(String),

    #[error("Account '{0}' has insufficient funds")]
    #[diagnostic(code(ledger::insufficient_funds))]
    InsufficientFunds(String),

    #[error("Account '{0}' balance would overflow")]
    #[diagnostic(code(ledger::balance_overflow))]
    BalanceOverflow(String),

    #[error("Cannot transfer to the same account")]
    #[diagnostic(code(ledger::same_account_transfer))]
    SameAccountTransfer,

    #[error("CSV error: {0}")]
    #[diagnostic(code(ledger::csv))]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(ledger::io))]
    IoError(#[from] std::io::Error),
}
