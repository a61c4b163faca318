//! Timer Board - a local timer service with persisted countdown timers
//!
//! This is the main entry point for the timer-board application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use timer_board::{
    api::create_router,
    config::Config,
    state::{AppState, TimerRegistry},
    storage::{FileStore, TimerStorage},
    tasks::{alert_dispatch_task, TickScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_board={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-board server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, storage_key={}",
          config.host, config.port, config.tick_ms, config.storage_key);

    // Open the timer store and load whatever was saved last session
    let storage = if config.in_memory {
        info!("Using in-memory storage, timers will not survive a restart");
        TimerStorage::in_memory(config.storage_key.clone())?
    } else {
        let store = FileStore::open(&config.data_dir)
            .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
        TimerStorage::new(Arc::new(store), config.storage_key.clone())?
    };
    let registry = TimerRegistry::load(storage);
    info!("Loaded {} timers", registry.timers().len());

    let state = Arc::new(AppState::new(registry, config.host.clone(), config.port));

    // Start the completion alert task before the first tick can fire
    tokio::spawn(alert_dispatch_task(state.subscribe_alerts(), config.alert_dispatcher()));

    // Start the tick scheduler
    let ticks = TickScheduler::new(Arc::clone(&state), config.tick_interval()).start();

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers             - List timers");
    info!("  POST   /timers             - Add a timer");
    info!("  PATCH  /timers/:id         - Edit a timer");
    info!("  DELETE /timers/:id         - Delete a timer");
    info!("  POST   /timers/:id/toggle  - Start or pause a timer");
    info!("  POST   /timers/:id/restart - Restart a timer");
    info!("  POST   /timers/:id/dismiss - Silence a completed timer's alert");
    info!("  GET    /status             - Timer counts and server status");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    ticks.stop().await;
    info!("Server shutdown complete");
    Ok(())
}
