use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use patientdb::{
    RecordService,
    config::{AppConfig, Cli, Command, StorageArgs},
    web::{AppState, build_router},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let (storage, command) = Cli::parse().into_parts()?;
    match command {
        Command::Serve { bind } => serve(AppConfig::new(bind, storage)).await,
        Command::Check => check(&storage),
        Command::List { sort_by, order } => list(&storage, sort_by.as_deref(), order.as_deref()),
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let gateway = Arc::new(config.storage.gateway());
    let service = RecordService::new(gateway);
    let app = build_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        bind_addr = %config.bind_addr,
        data_file = %config.storage.data_file.display(),
        format = ?config.storage.format,
        "patient API started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn check(storage: &StorageArgs) -> Result<()> {
    let service = RecordService::new(Arc::new(storage.gateway()));
    let store = service
        .snapshot()
        .with_context(|| format!("failed to load {}", storage.data_file.display()))?;
    println!("{}: {} valid record(s)", storage.data_file.display(), store.len());
    Ok(())
}

fn list(storage: &StorageArgs, sort_by: Option<&str>, order: Option<&str>) -> Result<()> {
    let service = RecordService::new(Arc::new(storage.gateway()));
    let views = service.sort(sort_by, order)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&views).context("failed to render patients")?
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("patientdb=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install sigterm handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
