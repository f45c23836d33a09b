//! Terminal client for the order list.
//!
//! Environment:
//! - `OPSGRID_ROLE`: comma separated roles of the actor (default `admin`)
//! - `OPSGRID_LATENCY_MS`: simulated data source latency (default 300)

mod app;
mod error;
mod paths;
mod sample;
mod terminal;
mod view;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use simplelog::{Config, LevelFilter, WriteLogger};

use opsgrid_lib::notify::NoticeQueue;
use opsgrid_lib::persist::{MemoryStore, PersistenceAdapter, SqliteStore};
use opsgrid_lib::source::MemorySource;
use opsgrid_lib::{EngineConfig, TableEngine};

use crate::error::TermError;
use crate::paths::AppPaths;

const DEFAULT_LATENCY_MS: u64 = 300;
const KEPT_LOGS: usize = 10;

fn init_logging(paths: Option<&AppPaths>) {
    let path = match paths {
        Some(paths) => {
            if let Err(e) = paths.rotate_logs(KEPT_LOGS) {
                eprintln!("could not rotate logs: {}", e);
            }
            paths.log_file()
        }
        None => PathBuf::from("opsgrid-term.log"),
    };
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("could not create log file {}: {}", path.display(), e),
    }
}

/// Opens the layout database, falling back to a session-only store.
async fn open_store(paths: Option<&AppPaths>) -> Arc<dyn PersistenceAdapter> {
    let Some(path) = paths.map(AppPaths::layouts_db) else {
        log::warn!("no data directory, layouts last for this session only");
        return Arc::new(MemoryStore::new());
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match SqliteStore::open(&path).await {
        Ok(store) => {
            log::info!("layouts stored in {}", path.display());
            Arc::new(store)
        }
        Err(e) => {
            log::warn!("failed to open {}: {}, using memory store", path.display(), e);
            Arc::new(MemoryStore::new())
        }
    }
}

async fn run(paths: Option<&AppPaths>) -> Result<(), TermError> {
    let roles = std::env::var("OPSGRID_ROLE").unwrap_or_else(|_| "admin".to_string());
    let latency = std::env::var("OPSGRID_LATENCY_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LATENCY_MS);

    let catalog = sample::order_catalog();
    let role = sample::actor_roles(&catalog, &roles);
    let source = MemorySource::new(sample::order_rows()).with_latency(Duration::from_millis(latency));
    let notices = Arc::new(NoticeQueue::new());

    let engine = TableEngine::builder(catalog, Arc::new(source))
        .config(EngineConfig::new("orders").with_page_size(20))
        .store(open_store(paths).await)
        .role_check(role)
        .notifier(notices.clone())
        .formatters(sample::order_formatters())
        .open()
        .await;
    log::info!("starting with roles [{}]", roles);

    app::run(engine, notices, format!("Orders | role: {}", roles)).await
}

#[tokio::main]
async fn main() {
    let paths = AppPaths::resolve();
    init_logging(paths.as_ref());

    if let Err(e) = run(paths.as_ref()).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
