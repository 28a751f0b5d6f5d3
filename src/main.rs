//! Command line client sending one purchase order to a Fedicom supplier.
//!
//! Parses CLI arguments, submits the order and prints the reconciliation.

mod cli;

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use fedicom::{
    client::{PartyProfile, submit_order},
    frame::Order,
    order::OrderRequest,
    reconcile::{LineOutcome, Reconciliation},
    session::Credentials,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::new(&cli.user, &cli.password)?;
    let Some(profile) = PartyProfile::configured(Some(cli.host.as_str()), Some(cli.port), credentials)
    else {
        tracing::warn!(host = %cli.host, port = cli.port, "no supplier endpoint configured");
        return Ok(());
    };
    let mut profile = profile.timeout(Duration::from_secs(cli.timeout));
    if let Some(party) = cli.party {
        profile = profile.party_code(party);
    }

    let mut builder = OrderRequest::builder(cli.reference, Order::new(&cli.customer, cli.order_number)?);
    for line in &cli.lines {
        builder = builder.article(&line.code, line.quantity)?;
    }
    let order = builder.build()?;

    match submit_order(&profile, &order).await? {
        None => println!("order {} accepted in full", order.reference()),
        Some(reconciliation) => print_reconciliation(&reconciliation),
    }
    Ok(())
}

fn print_reconciliation(reconciliation: &Reconciliation) {
    for line in reconciliation.lines() {
        let status = match line.outcome() {
            LineOutcome::Served { .. } => "served".to_owned(),
            LineOutcome::PartiallyServed { not_served, reason } => {
                format!("{not_served} not served ({reason})")
            }
            LineOutcome::Unserved { reason } => format!("not served ({reason})"),
        };
        println!(
            "{} requested {} shipping {} {status}",
            line.article(),
            line.requested(),
            line.quantity()
        );
    }
    let backorder = reconciliation.backorder();
    if !backorder.is_empty() {
        println!("backorder:");
        for line in backorder.lines() {
            println!("  {} x {} ({})", line.article(), line.quantity(), line.reason());
        }
    }
}
