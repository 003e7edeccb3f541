use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::settings::{AppConfig, StorageBackend};
use crate::infrastructure::db::memory::MemoryDocumentStore;
use crate::infrastructure::db::postgres::PgDocumentStore;
use crate::infrastructure::db::DocumentStore;
use crate::infrastructure::storage::local::LocalBlobStore;
use crate::infrastructure::storage::s3::S3BlobStore;
use crate::infrastructure::storage::BlobStore;
use crate::media::ffmpeg::FfmpegEngine;
use crate::media::MediaEngine;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod media;
mod modules;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().expect("invalid configuration");

    let documents: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let store = PgDocumentStore::connect(url)
                .await
                .expect("failed to connect to PostgreSQL");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, falling back to in-memory metadata store");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let storage: Arc<dyn BlobStore> = match config.storage_backend {
        StorageBackend::Local => Arc::new(
            LocalBlobStore::new(&config.storage_root, config.public_base_url.clone())
                .expect("failed to prepare storage root"),
        ),
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().expect("S3 storage selected but not configured");
            Arc::new(S3BlobStore::new(&s3.endpoint, &s3.bucket, &s3.access_key, &s3.secret_key).await)
        }
    };

    let engine: Arc<dyn MediaEngine> = Arc::new(FfmpegEngine::new());
    if !engine.is_available() {
        warn!("ffmpeg not found in PATH, render requests will fail until it is installed");
    }

    let state = AppState::new(config.clone(), documents, storage, engine);
    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
