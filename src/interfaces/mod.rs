//! Adapters between the outside world and the ledger: CSV batch replay and HTTP.

pub mod csv;
pub mod http;
pub mod replay;
