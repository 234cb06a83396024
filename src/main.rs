use chrono::NaiveDate;
use clap::Parser;
use innkeeper::application::engine::ReservationEngine;
use innkeeper::config::AppConfig;
use innkeeper::domain::ports::{
    ActorLookupBox, CatalogLookupBox, PaymentProcessorBox, ReservationStoreBox,
};
use innkeeper::infrastructure::clock::FixedClock;
use innkeeper::infrastructure::in_memory::InMemoryReservationStore;
#[cfg(feature = "storage-rocksdb")]
use innkeeper::infrastructure::rocksdb::RocksDBStore;
use innkeeper::infrastructure::simulated_payment::{SimulatedPaymentProcessor, ThreadRngChance};
use innkeeper::interfaces::csv::request_reader::{Command, RequestReader};
use innkeeper::interfaces::csv::reservation_writer::ReservationWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input reservation requests CSV file
    input: PathBuf,

    /// TOML configuration with the catalog, payment gateways and pricing policy.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today when checking cancellations.
    #[arg(long)]
    today: Option<NaiveDate>,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<ReservationStoreBox> {
    match db_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using RocksDB storage");
            Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        None => Ok(Box::new(InMemoryReservationStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<ReservationStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryReservationStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path).into_diagnostic()?,
        None => AppConfig::default(),
    };
    init_tracing(&config.logging.level);

    let catalog = config.catalog.seed().await;
    let actors: ActorLookupBox = Box::new(catalog.clone());
    let catalog: CatalogLookupBox = Box::new(catalog);
    let reservations = open_store(cli.db_path)?;
    let payments: PaymentProcessorBox = Box::new(SimulatedPaymentProcessor::new(
        config.payments.card_settings(),
        config.payments.upi_settings(),
        Box::new(ThreadRngChance),
    ));

    let mut engine = ReservationEngine::new(actors, catalog, reservations, payments)
        .with_price_policy(config.pricing.policy);
    if let Some(today) = cli.today {
        engine = engine.with_clock(Box::new(FixedClock::new(today)));
    }

    // Process requests in file order
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    for command in reader.commands() {
        let outcome = match command {
            Ok(Command::Create { actor_id, request }) => {
                engine.create(request, actor_id).await.map(|_| ())
            }
            Ok(Command::Cancel {
                actor_id,
                reservation_id,
            }) => engine.cancel(reservation_id, actor_id).await,
            Err(e) => {
                eprintln!("Error reading request: {}", e);
                continue;
            }
        };
        if let Err(e) = outcome {
            eprintln!("Error processing request: {}", e);
        }
    }

    let reservations = engine.list_all().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = ReservationWriter::new(stdout.lock());
    writer.write_reservations(reservations).into_diagnostic()?;

    Ok(())
}
