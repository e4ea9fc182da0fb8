//! Application layer: the transfer protocol and the ledger facade handlers call into.
//!
//! `TransferService` implements the two-lock transfer; `Ledger` resolves account ids
//! against the injected store and delegates to it.

pub mod ledger;
pub mod transfer;
