//! Interactive host for the health monitor.
//!
//! Reads the activity ledger from a JSON file written by the API client and
//! takes connectivity events from stdin:
//!
//! ```text
//! online | offline   report a connectivity transition
//! dismiss            close the current alert
//! refresh            evaluate immediately
//! status             print the current snapshot
//! quit               stop (also on EOF or Ctrl-C)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use health_monitor::config::{load_config, MonitorConfig};
use health_monitor::connectivity::ManualConnectivity;
use health_monitor::ledger::{FileStore, StoreLedger};
use health_monitor::observability::logging::init_logging;
use health_monitor::scheduler::TokioScheduler;
use health_monitor::time::SystemClock;
use health_monitor::{HealthMonitor, MonitorCapabilities};

#[derive(Parser)]
#[command(name = "health-monitor")]
#[command(about = "Connectivity and session health monitor", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger file, overriding `store.path` from the configuration.
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Start in the offline state.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.store.path = store.display().to_string();
    }

    init_logging(&config.observability.log_level);
    tracing::info!("health-monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        store = %config.store.path,
        poll_interval_ms = config.timing.poll_interval_ms,
        "Configuration loaded"
    );

    let connectivity = ManualConnectivity::new(!cli.offline);
    let monitor = HealthMonitor::start(
        &config,
        MonitorCapabilities {
            ledger: Arc::new(StoreLedger::new(FileStore::new(&config.store.path))),
            connectivity: Arc::new(connectivity.clone()),
            scheduler: Arc::new(TokioScheduler::current()?),
            clock: Arc::new(SystemClock),
        },
    );

    let mut snapshots = monitor.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = *snapshots.borrow_and_update();
            tracing::info!(
                label = snapshot.label,
                color = ?snapshot.color,
                alert_visible = snapshot.alert_visible,
                message = snapshot.message.unwrap_or(""),
                "Health snapshot"
            );
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "online" => connectivity.set(true),
                    "offline" => connectivity.set(false),
                    "dismiss" => monitor.dismiss(),
                    "refresh" => monitor.evaluate_now(),
                    "status" => println!("{}", serde_json::to_string_pretty(&monitor.snapshot())?),
                    "quit" | "exit" => break,
                    "" => {}
                    other => eprintln!("unknown command: {other}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received");
                break;
            }
        }
    }

    monitor.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}
