use std::sync::Arc;

use crate::config::Config;
use crate::services::{IngestionPipeline, MetadataStore};

/// Process-wide handles shared by all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn MetadataStore>,
    pub pipeline: Arc<IngestionPipeline>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn MetadataStore>, pipeline: IngestionPipeline) -> Self {
        Self {
            config: Arc::new(config),
            store,
            pipeline: Arc::new(pipeline),
        }
    }
}
