use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Fetches a remote document into a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, url: &str, local_path: &Path) -> AppResult<()>;
}

/// Plain HTTP GET downloader.
///
/// The response status is not inspected: whatever body the origin returns is
/// written out. A transfer that fails midway leaves the partial file behind.
#[derive(Clone, Default)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, url: &str, local_path: &Path) -> AppResult<()> {
        let mut out = tokio::fs::File::create(local_path)
            .await
            .map_err(|e| AppError::fetch(url, format!("creating {}: {}", local_path.display(), e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        debug!(url = %url, status = %response.status(), "Origin responded");

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AppError::fetch(url, e))?;
            out.write_all(&chunk)
                .await
                .map_err(|e| AppError::fetch(url, e))?;
            written += chunk.len() as u64;
        }
        out.flush().await.map_err(|e| AppError::fetch(url, e))?;

        info!(
            url = %url,
            path = %local_path.display(),
            bytes = written,
            "Document staged"
        );
        Ok(())
    }
}
