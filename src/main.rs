//! Pomodoro Gate - A work/break interval timer service
//!
//! This is the main entry point for the pomodoro-gate application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_gate::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::transition_notifier_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_gate={},tower_http=info", config.log_level()))
        .init();

    let timer_config = config.timer_config();
    info!("Starting pomodoro-gate server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, break={}min",
          config.host, config.port, config.work, config.break_minutes);

    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer_config));

    // Announce finished phases in the background
    let notifier_state = Arc::clone(&state);
    tokio::spawn(async move {
        transition_notifier_task(notifier_state).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timers                 - Open a timer");
    info!("  GET    /timers                 - List open timers");
    info!("  GET    /timers/:id             - Timer snapshot");
    info!("  POST   /timers/:id/start       - Start or resume");
    info!("  POST   /timers/:id/pause       - Pause");
    info!("  POST   /timers/:id/reset       - Reset to a full work phase");
    info!("  POST   /timers/:id/acknowledge - Acknowledge a finished phase");
    info!("  PUT    /timers/:id/config      - Change durations while idle");
    info!("  DELETE /timers/:id             - Close a timer");
    info!("  GET    /presets                - Duration presets");
    info!("  GET    /status                 - Server status");
    info!("  GET    /health                 - Health check");

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

    match state.close_all() {
        Ok(count) => info!("Closed {} timer(s)", count),
        Err(e) => tracing::error!("Failed to close timers: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
