//! Runtime settings, assembled from the command line in `main`.

use crate::application::transfer::DEFAULT_LOCK_TIMEOUT;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Bounded wait for each account lock taken by a transfer.
    pub lock_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Create the two sample accounts on startup.
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            seed: false,
        }
    }
}

/// Settings for the CSV replay driver.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// How many times a timed-out transfer is resubmitted.
    pub max_retries: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}
