//! Domain types: accounts, their locking discipline, and the store port.

pub mod account;
pub mod ports;
pub mod transfer;
