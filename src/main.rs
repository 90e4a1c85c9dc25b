//! Ledgerbook CLI
//!
//! Command-line interface for recording income and expenses and viewing the
//! totals and monthly profit derived from them.
//!
//! # Usage
//!
//! ```bash
//! ledgerbook add --type income --amount 100 --description Salary --date 2024-01-05
//! ledgerbook --user alice list --type expense --month 1
//! ledgerbook monthly --format csv > monthly.csv
//! ledgerbook export backup.json
//! ledgerbook --offline import-csv statement.csv
//! ```
//!
//! Every command loads the store first: from the user's remote store when
//! `--user` is given, otherwise (or if that fails) from the local cache under
//! `--data-dir`. Results go to stdout, diagnostics to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid input, unknown id, unreadable file, storage failure)

use ledgerbook::persistence::{self, DataSource, LoadOutcome, LocalCache, Session};
use ledgerbook::{cli, logging, BookError};
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();
    logging::init(args.verbose);

    let config = args.to_config();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let result: Result<(), BookError> = runtime.block_on(async {
        let ready = persistence::connect_remote(&config);
        let cache = LocalCache::new(config.cache_path());
        let mut session = Session::connect(cache, ready).await;

        if let LoadOutcome::Degraded { reason, source, .. } = session.load().await {
            // Without a configured remote the local cache is the expected source
            if config.remote_path().is_some() || source == DataSource::Memory {
                tracing::warn!("Working from {} ({})", source, reason);
            } else {
                tracing::info!("Working from {} ({})", source, reason);
            }
        }

        let mut output = std::io::stdout();
        cli::run(&args.command, &mut session, &mut output).await
    });

    if let Err(e) = result {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
