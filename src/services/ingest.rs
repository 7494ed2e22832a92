use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::FileLinks;
use crate::services::downloader::Downloader;
use crate::services::links::{staged_path, LinkDeriver};
use crate::services::metadata_store::MetadataStore;
use crate::services::uploader::Uploader;
use crate::services::validator::validate_filename;

/// Result of a completed ingestion.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub id: i32,
    pub links: FileLinks,
    /// Set when the object store rejected the upload but the pipeline was
    /// configured to answer with links anyway.
    pub upload_error: Option<String>,
}

/// Sequences validate, record, download, upload and link derivation for a
/// single submitted URL.
///
/// Steps run strictly in that order. Nothing is rolled back: a failed download
/// or upload leaves the metadata record (and any staged bytes) in place.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn MetadataStore>,
    downloader: Arc<dyn Downloader>,
    uploader: Arc<dyn Uploader>,
    links: LinkDeriver,
    staging_dir: PathBuf,
    fail_on_upload_error: bool,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        downloader: Arc<dyn Downloader>,
        uploader: Arc<dyn Uploader>,
        links: LinkDeriver,
        staging_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            downloader,
            uploader,
            links,
            staging_dir,
            fail_on_upload_error: false,
        }
    }

    /// Makes an object store failure terminal instead of answering with links
    /// to an object that was never written.
    pub fn with_fail_on_upload_error(mut self, fail: bool) -> Self {
        self.fail_on_upload_error = fail;
        self
    }

    pub async fn ingest(&self, url: &str) -> AppResult<Ingested> {
        let start = Instant::now();

        let filename = validate_filename(url).map_err(|e| {
            warn!(url = %url, error = %e, "Rejected submission");
            e
        })?;

        let id = self.store.create_file(url, filename).await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to create metadata record");
            e
        })?;
        debug!(id, url = %url, filename = %filename, "Metadata record created");

        let local_path = staged_path(&self.staging_dir, id);
        self.downloader.fetch(url, &local_path).await.map_err(|e| {
            error!(id, url = %url, error = %e, "Download failed, record left without content");
            e
        })?;

        let upload_error = match self.uploader.upload(id).await {
            Ok(()) => None,
            Err(e) if self.fail_on_upload_error => {
                error!(id, url = %url, error = %e, "Upload failed");
                return Err(match e {
                    AppError::UploadFailure { message, .. } => AppError::upload(url, message),
                    other => other,
                });
            }
            Err(e) => {
                warn!(
                    id,
                    url = %url,
                    error = %e,
                    "Upload failed, returning links to a missing object"
                );
                Some(e.to_string())
            }
        };

        let links = FileLinks {
            temporary_link: self.links.temporary_link(id),
            persistent_link: self.links.persistent_link(id),
        };

        info!(
            id,
            url = %url,
            total_time_ms = start.elapsed().as_millis() as u64,
            "Ingestion completed"
        );

        Ok(Ingested {
            id,
            links,
            upload_error,
        })
    }
}
