use dockgate::cli::configure_cli;
use dockgate::config::{BackendKind, Config, load_config};
use dockgate::domain::containers::ports::ContainerBackend;
use dockgate::domain::containers::service::Service;
use dockgate::inbound::server::{AppState, create_app};
use dockgate::outbound::docker::DockerBackend;
use dockgate::outbound::memory::MemoryBackend;
use env_logger::Env;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = configure_cli();
    let mut config = load_config(cli.config_path.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    match config.backend {
        BackendKind::Docker => serve(&config, DockerBackend::connect()?).await,
        BackendKind::Memory => {
            info!(
                "Using the in-memory backend with {} seeded containers, no docker daemon involved",
                config.memory_containers.len()
            );
            let backend = MemoryBackend::with_records(config.memory_containers.clone()).await;
            serve(&config, backend).await
        }
    }
}

async fn serve<CB: ContainerBackend>(
    config: &Config,
    backend: CB,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = Service::new(backend)
        .with_bulk_concurrency(config.bulk_concurrency)
        .with_call_grace(Duration::from_secs(config.call_grace_secs));
    let state = AppState {
        container_service: Arc::new(service),
        api_secret: config.api_secret.clone(),
    };

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, gracefully shutting down...");
        let _ = shutdown_tx.send(true);
    })?;

    let app = create_app(state).await;
    let listener = TcpListener::bind(config.address()).await?;

    info!("Server running on http://{}", config.address());
    info!("Health check: http://{}/health (no auth required)", config.address());
    if config.api_secret.is_some() {
        info!("API endpoints require Authorization: Bearer <secret>");
    }
    info!("  GET    /api/v1/containers                     - List containers");
    info!("  GET    /api/v1/containers/{{id}}                - Inspect a container");
    info!("  POST   /api/v1/containers/{{id}}/{{operation}}    - start | stop | restart");
    info!("  POST   /api/v1/containers/bulk/{{operation}}    - Same operation on many containers");
    info!("  GET    /api/v1/system/info                    - Docker system counters");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}
