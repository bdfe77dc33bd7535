//! Command-line front end for the reconciliation engine

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use recon_core::{CsvStore, ReconResult, Reconciler, ReconcilerOptions, RecordStore};

#[derive(Debug, Parser)]
#[command(
    name = "recon",
    version,
    about = "Match an order ledger against a payment/refund ledger and settle fees"
)]
struct Args {
    /// Path to the order ledger CSV
    order_file: PathBuf,
    /// Path to the payment/refund ledger CSV
    payment_file: PathBuf,
    /// Output file (defaults to updating the order file in place)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Trace every row's matching decision
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> ReconResult<()> {
    let mut store = CsvStore::new(&args.order_file, &args.payment_file);
    if let Some(output) = &args.output {
        store = store.with_output(output);
    }

    let mut orders = store.load_orders().await?;
    let payments = store.load_payments().await?;

    let engine = Reconciler::with_options(ReconcilerOptions {
        verbose: args.verbose,
    });
    let report = engine.reconcile(&mut orders, &payments);

    store.write_orders(&orders).await?;

    let destination = args.output.as_ref().unwrap_or(&args.order_file);
    println!(
        "Settled {} of {} orders ({} zero-amount, {} excluded, {} unmatched, {} matched without a usable fee)",
        report.settled,
        report.total_orders,
        report.zero_amount,
        report.excluded,
        report.unmatched,
        report.matched_without_fee
    );
    println!("Result written to: {}", destination.display());

    Ok(())
}
