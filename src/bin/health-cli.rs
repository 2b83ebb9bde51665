use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use health_monitor::config::{load_config, MonitorConfig};
use health_monitor::connectivity::ManualConnectivity;
use health_monitor::ledger::{FileStore, StoreLedger};
use health_monitor::observability::logging::init_logging;
use health_monitor::scheduler::ManualScheduler;
use health_monitor::time::{Clock, SystemClock};
use health_monitor::{HealthMonitor, MonitorCapabilities};

#[derive(Parser)]
#[command(name = "health-cli")]
#[command(about = "Inspect the health derived from an activity ledger", long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the ledger once and print the snapshot
    Status {
        /// Treat the host as offline
        #[arg(long)]
        offline: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.store.path = store.display().to_string();
    }
    init_logging("warn");

    match cli.command {
        Commands::Status { offline } => {
            // Virtual time pinned to now: the first evaluation runs at start
            // and no timer ever fires.
            let scheduler = Arc::new(ManualScheduler::new(SystemClock.now()));
            let monitor = HealthMonitor::start(
                &config,
                MonitorCapabilities {
                    ledger: Arc::new(StoreLedger::new(FileStore::new(&config.store.path))),
                    connectivity: Arc::new(ManualConnectivity::new(!offline)),
                    scheduler: scheduler.clone(),
                    clock: scheduler,
                },
            );

            let report = serde_json::json!({
                "snapshot": monitor.snapshot(),
                "status": monitor.status(),
                "alert": monitor.alert(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            monitor.shutdown();
        }
    }

    Ok(())
}
