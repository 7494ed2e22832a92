use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docrelay::config::{Config, LogFormat};
use docrelay::handlers::create_router;
use docrelay::services::{
    HttpDownloader, IngestionPipeline, LinkDeriver, ObjectStoreUploader, PgMetadataStore,
    UnavailableUploader, Uploader,
};
use docrelay::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Fatal before logging exists: the error is printed by the returned Result
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    if dotenv.is_err() {
        tracing::info!("Config from .env file was not loaded");
    }
    config.log_summary();

    tracing::info!("Starting docrelay");

    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| format!("Error creating staging dir {}", config.staging_dir.display()))?;

    let store = PgMetadataStore::connect(&config.database_url, config.db_max_connections).await?;
    store.migrate().await?;

    let links = LinkDeriver::from_config(&config);
    let uploader: Arc<dyn Uploader> = match ObjectStoreUploader::s3(&config) {
        Ok(uploader) => Arc::new(uploader),
        Err(e) => {
            tracing::warn!(error = %e, "Object store unavailable, uploads will fail");
            Arc::new(UnavailableUploader::new(e.to_string(), links.clone()))
        }
    };

    let store = Arc::new(store);
    let pipeline = IngestionPipeline::new(
        store.clone(),
        Arc::new(HttpDownloader::default()),
        uploader,
        links,
        config.staging_dir.clone(),
    )
    .with_fail_on_upload_error(config.fail_on_upload_error);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let app = create_router(AppState::new(config, store, pipeline));

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docrelay=debug,tower_http=debug,axum::rejection=trace".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
