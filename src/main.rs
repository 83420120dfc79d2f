//! QIF Reader CLI
//!
//! Reads a QIF file and writes a CSV summary of its accounts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- export.qif > accounts.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` to trace section dispatch

use log::info;
use qif_reader::{CancelToken, QifError, QifReader, Result};
use std::env;
use std::io;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(QifError::MissingArgument);
    }

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let input_path = &args[1];
    let document = QifReader::open(input_path)
        .await?
        .with_cancellation(cancel)
        .read_document()
        .await?;

    info!(
        "{} accounts, {} transactions, total balance {}",
        document.accounts().len(),
        document.transaction_count(),
        document.balance()
    );

    let stdout = io::stdout();
    let handle = stdout.lock();
    document.write_summary(handle)?;

    Ok(())
}
