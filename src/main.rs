use clap::{Args, Parser, Subcommand};
use ledger_engine::application::ledger::Ledger;
use ledger_engine::config::{LedgerConfig, LogConfig, ReplayConfig, ServerConfig};
use ledger_engine::domain::ports::AccountStoreRef;
use ledger_engine::infrastructure::in_memory::InMemoryAccountStore;
use ledger_engine::interfaces::csv::account_writer::AccountWriter;
use ledger_engine::interfaces::{http, replay};
use ledger_engine::logging::init_logging;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, env = "LEDGER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "LEDGER_LOG_JSON")]
    log_json: bool,

    /// How long a transfer waits for each account lock, in milliseconds
    #[arg(
        long,
        global = true,
        env = "LEDGER_LOCK_TIMEOUT_MS",
        default_value_t = 5000
    )]
    lock_timeout_ms: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Load accounts from CSV, run every transfer concurrently, print final balances
    Replay {
        /// Accounts CSV file (id, balance)
        accounts: PathBuf,

        /// Transfers CSV file (from, to, amount)
        transfers: PathBuf,

        /// Resubmissions allowed for a transfer that timed out waiting for a lock
        #[arg(long, default_value_t = 3)]
        max_retries: u32,
    },
    /// Serve the ledger over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "LEDGER_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,

        /// Create two sample accounts on startup
        #[arg(long)]
        seed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        level: cli.global.log_level,
        json: cli.global.log_json,
    });

    let ledger_config = LedgerConfig {
        lock_timeout: Duration::from_millis(cli.global.lock_timeout_ms),
    };
    let store: AccountStoreRef = Arc::new(InMemoryAccountStore::new());
    let ledger = Ledger::new(store, &ledger_config);

    match cli.command {
        Command::Replay {
            accounts,
            transfers,
            max_retries,
        } => {
            let accounts = File::open(accounts).into_diagnostic()?;
            replay::load_accounts(&ledger, accounts).await;

            let transfers = File::open(transfers).into_diagnostic()?;
            replay::replay_transfers(&ledger, transfers, &ReplayConfig { max_retries }).await;

            let accounts = ledger.accounts().await;
            let stdout = io::stdout();
            let mut writer = AccountWriter::new(stdout.lock());
            writer.write_accounts(&accounts)?;
        }
        Command::Serve { bind, seed } => {
            http::serve(ledger, &ServerConfig { bind, seed }).await?;
        }
    }

    Ok(())
}
