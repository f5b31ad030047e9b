use clap::Parser;
use proteus::adapters::endpoint_registry::InMemoryEndpointRegistry;
use proteus::adapters::health_handler::HealthHandler;
use proteus::adapters::metrics_handler::MetricsCollector;
use proteus::adapters::mock_service::MockService;
use proteus::cli::Cli;
use proteus::config::{watcher::ConfigWatcher, Settings, ENDPOINTS_DIR};
use proteus::domain::EndpointRegistry;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let options = settings.mock.generate_options();
    let seed = settings.mock.seed;

    info!(
        "Starting Proteus mock server on {}:{} ({} endpoints across {} projects)",
        host,
        port,
        settings.endpoint_count(),
        settings.projects.len()
    );

    // Wrap settings in Arc<RwLock> for live reload
    let settings = Arc::new(RwLock::new(settings));

    let _watcher = if cli.no_watch {
        None
    } else {
        let root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let paths = vec![cli.config.clone(), root.join(ENDPOINTS_DIR)];
        let settings_for_watcher = settings.clone();
        let cli_for_watcher = cli.clone();
        Some(ConfigWatcher::new(&paths, move || {
            match Settings::new_with_cli(&cli_for_watcher) {
                Ok(new_settings) => {
                    let count = new_settings.endpoint_count();
                    let mut w = settings_for_watcher.blocking_write();
                    *w = new_settings;
                    info!("Configuration reloaded successfully ({} endpoints)", count);
                }
                Err(e) => error!("Failed to reload configuration: {}", e),
            }
        })?)
    };

    let registry: Arc<dyn EndpointRegistry> =
        Arc::new(InMemoryEndpointRegistry::new(settings.clone()));
    let mock_service = Arc::new(MockService::new(registry.clone(), options, seed));
    let health_handler = Arc::new(HealthHandler::new(registry));
    let metrics = Arc::new(MetricsCollector::new()?);

    let app = proteus::create_app(mock_service, health_handler, metrics);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
