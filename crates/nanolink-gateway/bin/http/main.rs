mod cli;

use crate::cli::{StorageBackendArg, CLI};
use clap::Parser;
use nanolink_cache::MokaLinkCache;
use nanolink_gateway::{App, AppState};
use nanolink_generator::RandomGenerator;
use nanolink_shortener::{Shortener, ShortenerService, ShortenerSettings};
use nanolink_storage::{
    CachedRepository, InMemoryRepository, MySqlRepository, PoolSettings, Repository,
    SqliteRepository,
};
use nanolink_telemetry::TelemetryConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

const SERVICE_NAME: &str = "nanolink-gateway";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and flags still apply.
    let _ = dotenvy::dotenv();

    let config = CLI::parse();

    let _telemetry = nanolink_telemetry::init(
        &TelemetryConfig::builder()
            .service_name(SERVICE_NAME)
            .log_format(config.log_format)
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        max_attempts = config.max_attempts,
        cache_capacity = config.cache_capacity,
        "starting nanolink gateway"
    );

    let pool_settings = PoolSettings::builder()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .build();

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, InMemoryRepository::new()).await?;
        }
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::connect(&config.database_url, pool_settings).await?;
            repository.migrate().await?;
            let result = run_server(&config, repository.clone()).await;
            repository.close().await;
            result?;
        }
        StorageBackendArg::Mysql => {
            let repository = MySqlRepository::connect(&config.database_url, pool_settings).await?;
            repository.migrate().await?;
            let result = run_server(&config, repository.clone()).await;
            repository.close().await;
            result?;
        }
    }

    info!("nanolink gateway stopped");
    Ok(())
}

async fn run_server<R: Repository>(config: &CLI, repository: R) -> anyhow::Result<()> {
    let settings = ShortenerSettings::builder()
        .max_attempts(config.max_attempts)
        .build();
    let generator = RandomGenerator::new();

    let shortener: Arc<dyn Shortener> = if config.cache_capacity > 0 {
        let cache = MokaLinkCache::with_capacity(config.cache_capacity);
        Arc::new(ShortenerService::with_settings(
            CachedRepository::new(repository, cache),
            generator,
            settings,
        ))
    } else {
        Arc::new(ShortenerService::with_settings(
            repository, generator, settings,
        ))
    };

    let state = AppState::new(shortener, config.public_base_url.clone());
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening for http requests");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
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

    info!("shutdown signal received, draining connections");
}
