//! captierd — the capacity tiering daemon.
//!
//! Thin driver around the evaluation core: parses settings, wires the
//! inventory and store backends, then runs cycles of
//! evaluate → render → reconcile on a fixed interval.
//!
//! # Usage
//!
//! ```text
//! captierd run --inventory-url http://inventory.internal \
//!              --store-url http://configs.internal \
//!              --namespace kube-system --catch-all
//! ```
//!
//! Every flag is also settable through the environment (`ASG_CONTAINS`,
//! `LT_CONTAINS`, `CATCH_ALL`, `SKIP_CREATION`, `SLEEP_MINUTES`,
//! `NAMESPACE`), matching the deployment surface of earlier revisions.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info};

use captier_core::{
    CapacityResult, CapacitySource, ConfigStore, EvalConfig, GroupSource, PRIORITY_EXPANDER_NAME,
};
use captier_engine::TieringEngine;
use captier_providers::{FileInventory, FileStore, HttpInventory, HttpStore};
use captier_reconcile::Reconciler;

#[derive(Parser)]
#[command(name = "captierd", about = "Capacity tiering daemon for the cluster autoscaler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the fleet and publish the priority listing on an interval.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// TOML inventory snapshot with groups and subnets.
    #[arg(long, value_name = "PATH", conflicts_with = "inventory_url")]
    inventory_file: Option<PathBuf>,

    /// Base URL of the inventory API.
    #[arg(long, value_name = "URL", env = "INVENTORY_URL")]
    inventory_url: Option<String>,

    /// Directory to write artifacts into.
    #[arg(long, value_name = "PATH", conflicts_with = "store_url")]
    store_dir: Option<PathBuf>,

    /// Base URL of the config API.
    #[arg(long, value_name = "URL", env = "STORE_URL")]
    store_url: Option<String>,

    /// Artifact namespace.
    #[arg(long, env = "NAMESPACE", default_value = "kube-system")]
    namespace: String,

    /// Artifact name.
    #[arg(long, default_value = PRIORITY_EXPANDER_NAME)]
    artifact_name: String,

    /// Keep only groups whose name contains this substring.
    #[arg(long, env = "ASG_CONTAINS", default_value = "")]
    asg_contains: String,

    /// Keep only groups whose launch template name contains this substring.
    #[arg(long, env = "LT_CONTAINS", default_value = "")]
    lt_contains: String,

    /// Append the wildcard catch-all tier at the lowest priority.
    #[arg(long, env = "CATCH_ALL")]
    catch_all: bool,

    /// Report intended artifact creations instead of performing them.
    #[arg(long, env = "SKIP_CREATION")]
    skip_creation: bool,

    /// Minutes between cycles.
    #[arg(long, env = "SLEEP_MINUTES", default_value = "10")]
    interval_minutes: u64,

    /// Run exactly one cycle and exit.
    #[arg(long)]
    once: bool,
}

/// Where group and subnet data comes from.
///
/// Sources are rebuilt every cycle so free-address counts are always
/// current; the file backend re-reads its snapshot, the HTTP backend
/// reuses its connection pool.
enum InventoryBackend {
    File(PathBuf),
    Http(Arc<HttpInventory>),
}

impl InventoryBackend {
    fn sources(&self) -> CapacityResult<(Arc<dyn GroupSource>, Arc<dyn CapacitySource>)> {
        match self {
            InventoryBackend::File(path) => {
                let inventory = Arc::new(FileInventory::load(path)?);
                Ok((inventory.clone(), inventory))
            }
            InventoryBackend::Http(inventory) => Ok((inventory.clone(), inventory.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,captierd=debug,captier=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args).await,
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let inventory = match (&args.inventory_file, &args.inventory_url) {
        (Some(path), _) => {
            info!(path = ?path, "using file inventory");
            InventoryBackend::File(path.clone())
        }
        (None, Some(url)) => {
            info!(url = %url, "using HTTP inventory");
            InventoryBackend::Http(Arc::new(HttpInventory::new(url)?))
        }
        (None, None) => anyhow::bail!("one of --inventory-file or --inventory-url is required"),
    };

    let store: Arc<dyn ConfigStore> = match (&args.store_dir, &args.store_url) {
        (Some(dir), _) => {
            info!(dir = ?dir, "using file store");
            Arc::new(FileStore::new(dir.clone()))
        }
        (None, Some(url)) => {
            info!(url = %url, "using HTTP store");
            Arc::new(HttpStore::new(url)?)
        }
        (None, None) => anyhow::bail!("one of --store-dir or --store-url is required"),
    };

    let eval_config = EvalConfig {
        name_filter: args.asg_contains.clone(),
        template_filter: args.lt_contains.clone(),
        include_catch_all: args.catch_all,
    };
    let reconciler = Reconciler::new(store, args.skip_creation);
    let interval = Duration::from_secs(args.interval_minutes * 60);

    // Shutdown signal.
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        let _ = shutdown_tx.send(true);
    });

    info!(
        namespace = %args.namespace,
        artifact = %args.artifact_name,
        interval_minutes = args.interval_minutes,
        once = args.once,
        "captierd started"
    );

    loop {
        if let Err(e) = run_cycle(&inventory, &reconciler, &eval_config, &args).await {
            error!(error = %e, "cycle failed");
        }

        if args.once {
            info!("single-shot mode, exiting");
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown_rx.changed() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("captierd stopped");
    Ok(())
}

/// One evaluation cycle: list, score, tier, publish.
async fn run_cycle(
    inventory: &InventoryBackend,
    reconciler: &Reconciler,
    eval_config: &EvalConfig,
    args: &RunArgs,
) -> anyhow::Result<()> {
    let (groups, capacity) = inventory.sources()?;
    let engine = TieringEngine::new(groups, capacity);

    let eval = engine.evaluate(eval_config).await?;
    info!(
        discovered = eval.stats.discovered,
        scored = eval.stats.scored,
        rejected_by_filter = eval.stats.rejected_by_filter,
        missing_template = eval.stats.missing_template,
        capacity_failures = eval.stats.capacity_failures,
        tiers = eval.listing.tiers.len(),
        "evaluation complete"
    );

    let outcome = reconciler
        .reconcile(
            &args.namespace,
            &args.artifact_name,
            eval.listing.into_payload(),
        )
        .await?;
    info!(outcome = ?outcome, "reconcile complete");

    Ok(())
}
