use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use satcircle::application::engine::RoscaEngine;
use satcircle::domain::group::GroupConfig;
use satcircle::domain::member::MemberId;
use satcircle::domain::ports::{InvoiceIssuerBox, LedgerStoreBox, PriceOracle};
use satcircle::error::RoscaError;
use satcircle::infrastructure::in_memory::InMemoryLedgerStore;
use satcircle::infrastructure::mock_ln::{FixedRate, MockLnNode};
use satcircle::interfaces::csv::event_reader::{EventKind, EventReader, LedgerEvent};
use satcircle::interfaces::csv::summary_writer::SummaryWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input events CSV file
    events: PathBuf,

    /// Group configuration JSON (optional). Without it, the built-in
    /// four-member demo group is used.
    #[arg(long)]
    group: Option<PathBuf>,

    /// BTC/USD rate for the fiat column of the member summary
    #[arg(long, default_value = "50000")]
    btc_price: Decimal,

    /// Output per-round collection reports instead of member summaries
    #[arg(long)]
    rounds: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries nothing but the report CSV.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let group = match &cli.group {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            GroupConfig::from_reader(file).into_diagnostic()?
        }
        None => GroupConfig::demo(),
    };

    let store: LedgerStoreBox = Box::new(InMemoryLedgerStore::from_group(&group));
    let issuer: InvoiceIssuerBox = Box::new(MockLnNode::new());
    let engine = RoscaEngine::new(group, store, issuer).into_diagnostic()?;

    // Replay events
    let file = File::open(&cli.events).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event_result in reader.events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = apply_event(&engine, event).await {
                    eprintln!("Error applying event: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading event: {}", e);
            }
        }
    }

    // Output final state
    let oracle = FixedRate::new(cli.btc_price);
    let stdout = io::stdout();
    let mut writer = SummaryWriter::new(stdout.lock());
    if cli.rounds {
        let reports = engine.round_reports().await.into_diagnostic()?;
        writer.write_rounds(&reports).into_diagnostic()?;
    } else {
        let summaries = engine.member_summaries().await.into_diagnostic()?;
        writer
            .write_members(&summaries, oracle.btc_usd())
            .into_diagnostic()?;
    }

    Ok(())
}

async fn apply_event(engine: &RoscaEngine, event: LedgerEvent) -> satcircle::error::Result<()> {
    match event.event {
        EventKind::Advance => {
            engine.advance_round().await;
            Ok(())
        }
        EventKind::Retreat => {
            engine.retreat_round().await;
            Ok(())
        }
        EventKind::Invoice => {
            let (member, round) = payment_target(engine, &event).await?;
            engine.create_invoice_for(member, round).await.map(|_| ())
        }
        EventKind::Confirm => {
            let (member, round) = payment_target(engine, &event).await?;
            engine.confirm_payment(member, round).await.map(|_| ())
        }
    }
}

/// Resolves the cell a payment event targets; a blank round means the
/// round the cursor is currently on.
async fn payment_target(engine: &RoscaEngine, event: &LedgerEvent) -> satcircle::error::Result<(MemberId, u32)> {
    let member = event.member.ok_or_else(|| {
        RoscaError::Validation(format!("{:?} event requires a member", event.event))
    })?;
    let round = match event.round {
        Some(round) => round,
        None => engine.current_round().await,
    };
    Ok((member, round))
}
