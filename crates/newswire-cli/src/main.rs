use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use newswire_client::ReqwestFetcher;
use newswire_core::consumer::{ConsumerConfig, ConsumerService, TracingConsumerReporter};
use newswire_core::models::WorkItem;
use newswire_core::producer::Producer;
use newswire_db::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "newswire", version, about = "Queue-mediated article pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a batch of work descriptors into the shared queue
    Publish {
        /// Path to a JSON array of work descriptors
        /// (id, url, source, category, optional priority)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Run a consumer instance until interrupted
    Consume {
        /// Stable consumer id (defaults to a generated one)
        #[arg(long, env = "NEWSWIRE_CONSUMER_ID")]
        consumer_id: Option<String>,

        /// Per-request fetch timeout in seconds, redirects included
        #[arg(long, env = "NEWSWIRE_FETCH_TIMEOUT", default_value_t = 10)]
        fetch_timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish { input } => {
            let db = connect_db().await?;
            cmd_publish(&input, &db).await?;
        }
        Commands::Consume {
            consumer_id,
            fetch_timeout,
        } => {
            let db = connect_db().await?;
            cmd_consume(consumer_id, fetch_timeout, &db).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and run migrations.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(db)
}

/// Load the bulk work-descriptor input file.
fn load_items(path: &Path) -> Result<Vec<WorkItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let items: Vec<WorkItem> =
        serde_json::from_str(&raw).context("Invalid JSON in input file")?;
    Ok(items)
}

async fn cmd_publish(input: &Path, db: &Database) -> Result<()> {
    let items = load_items(input)?;
    if items.is_empty() {
        tracing::error!("No articles to publish");
        return Ok(());
    }
    tracing::info!(count = items.len(), input = %input.display(), "Loaded work items");

    let producer = Producer::new(db.work_queue(), db.published_markers());
    let report = producer.publish_all(items).await;

    println!(
        "Publishing complete: {} published, {} skipped",
        report.published, report.skipped
    );

    Ok(())
}

async fn cmd_consume(consumer_id: Option<String>, fetch_timeout: u64, db: &Database) -> Result<()> {
    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(fetch_timeout))
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut config = ConsumerConfig::default();
    if let Some(id) = consumer_id {
        config = config.with_consumer_id(id);
    }

    let service = ConsumerService::new(db.work_queue(), fetcher, db.articles(), config);

    // Ctrl-C requests shutdown; the loop observes it at the next idle
    // boundary and finishes any in-flight item first.
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            signal_token.cancel();
        }
    });

    service.run(token, &TracingConsumerReporter).await;

    Ok(())
}
