use std::sync::Arc;
use std::time::Duration;

use tracing::info;

pub mod bootstrap;
pub mod cli;
pub mod clock;
pub mod config;
pub mod notify;
pub mod service;

pub use cli::Cli;
pub use config::AgentConfig;
use service::{Action, ServiceState, StopwatchService};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown action: {0}")]
    Action(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing();

    let (cfg_path, cfg) = AgentConfig::find_and_load(cli.config)?;
    match &cfg_path {
        Some(p) => info!(path=?p, "loaded config"),
        None => info!("no config file found; using defaults"),
    }

    // Channel bootstrap runs once per process, before the service exists.
    bootstrap::ensure_channel().await;

    let backend = notify::default_backend(&cfg.title, cli.log_only || cfg.log_only);
    let mut service = StopwatchService::new(
        Arc::new(clock::SystemClock),
        backend,
        Duration::from_millis(cfg.tick_interval_ms),
    );

    if cli.idle {
        info!("starting idle; send SIGUSR1 to begin");
    } else {
        service.dispatch(Action::Start).await;
    }

    control_loop(&mut service).await;

    service.dispatch(Action::Stop).await;
    debug_assert_eq!(service.state(), ServiceState::Stopped);
    Ok(())
}

/// Maps external triggers onto service commands until a stop arrives.
async fn control_loop(service: &mut StopwatchService) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut start_sig = signal(SignalKind::user_defined1()).expect("listen SIGUSR1");
        let mut stop_sig = signal(SignalKind::user_defined2()).expect("listen SIGUSR2");
        let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
        loop {
            tokio::select! {
                _ = start_sig.recv() => {
                    info!("received SIGUSR1; dispatching START");
                    service.dispatch(Action::Start).await;
                }
                _ = stop_sig.recv() => {
                    info!("received SIGUSR2; stopping");
                    break;
                }
                _ = sigint.recv() => {
                    info!("received SIGINT; stopping");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM; stopping");
                    break;
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = service;
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C; stopping");
    }
}
