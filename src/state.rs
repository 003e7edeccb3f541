use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::DocumentStore;
use crate::infrastructure::storage::BlobStore;
use crate::media::MediaEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub documents: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn BlobStore>,
    pub engine: Arc<dyn MediaEngine>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn BlobStore>,
        engine: Arc<dyn MediaEngine>,
    ) -> Self {
        Self {
            config,
            documents,
            storage,
            engine,
        }
    }
}
