use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::links::{staged_path, LinkDeriver};

/// Number of leading bytes considered when sniffing a content type.
const SNIFF_LEN: usize = 512;

/// Relays a staged document into durable storage.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, id: i32) -> AppResult<()>;
}

/// Uploads staged files to any `object_store` backend in a single put.
#[derive(Clone)]
pub struct ObjectStoreUploader {
    store: Arc<dyn ObjectStore>,
    links: LinkDeriver,
    staging_dir: PathBuf,
}

impl ObjectStoreUploader {
    pub fn new(store: Arc<dyn ObjectStore>, links: LinkDeriver, staging_dir: PathBuf) -> Self {
        Self {
            store,
            links,
            staging_dir,
        }
    }

    /// S3 uploader using ambient AWS credentials and the configured region
    /// and bucket.
    pub fn s3(config: &Config) -> AppResult<Self> {
        let store = AmazonS3Builder::from_env()
            .with_region(config.aws_region.clone())
            .with_bucket_name(config.aws_bucket.clone())
            .build()
            .map_err(|e| AppError::config(format!("S3 store: {}", e)))?;

        info!(
            bucket = %config.aws_bucket,
            region = %config.aws_region,
            "S3 uploader configured"
        );

        Ok(Self::new(
            Arc::new(store),
            LinkDeriver::from_config(config),
            config.staging_dir.clone(),
        ))
    }
}

#[async_trait]
impl Uploader for ObjectStoreUploader {
    async fn upload(&self, id: i32) -> AppResult<()> {
        let key = self.links.object_key(id);
        let local_path = staged_path(&self.staging_dir, id);

        let data = tokio::fs::read(&local_path).await.map_err(|e| {
            AppError::upload(&key, format!("err opening file {}: {}", local_path.display(), e))
        })?;

        let size = data.len();
        let content_type = sniff_content_type(&data);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let mut options = PutOptions::default();
        options.attributes = attributes;

        let start = Instant::now();
        let location = ObjectPath::from(key.as_str());
        self.store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), options)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Object store upload failed"
                );
                AppError::upload(&key, format!("bad response: {}", e))
            })?;

        info!(
            key = %key,
            size_bytes = size,
            content_type = content_type,
            duration_ms = start.elapsed().as_millis() as u64,
            "Object store upload successful"
        );
        Ok(())
    }
}

/// Stand-in used when no object store could be configured at startup.
pub struct UnavailableUploader {
    reason: String,
    links: LinkDeriver,
}

impl UnavailableUploader {
    pub fn new(reason: impl Into<String>, links: LinkDeriver) -> Self {
        Self {
            reason: reason.into(),
            links,
        }
    }
}

#[async_trait]
impl Uploader for UnavailableUploader {
    async fn upload(&self, id: i32) -> AppResult<()> {
        Err(AppError::upload(self.links.object_key(id), &self.reason))
    }
}

/// Guesses a MIME type from the leading bytes of a document.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if head.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if head.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }

    let trimmed = trim_leading_whitespace(head);
    if starts_with_ignore_case(trimmed, b"<!doctype html") || starts_with_ignore_case(trimmed, b"<html") {
        return "text/html; charset=utf-8";
    }

    if head.is_empty() || is_text(head) {
        return "text/plain; charset=utf-8";
    }

    "application/octet-stream"
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn is_text(data: &[u8]) -> bool {
    // Control bytes other than common whitespace mark binary content
    let no_binary = data
        .iter()
        .all(|&b| b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r' | 0x0C | 0x1B));
    if !no_binary {
        return false;
    }
    match std::str::from_utf8(data) {
        Ok(_) => true,
        // A multi-byte character may be cut at the sniff boundary
        Err(e) => e.error_len().is_none(),
    }
}
