//! Shared fakes and app builders for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, NaiveDate};
use tempfile::TempDir;
use tower::ServiceExt;

use docrelay::config::Config;
use docrelay::error::{AppError, AppResult};
use docrelay::handlers::create_router;
use docrelay::models::FileRecord;
use docrelay::services::{Downloader, IngestionPipeline, LinkDeriver, MetadataStore, Uploader};
use docrelay::AppState;

pub const API_KEY: &str = "SECRET";
pub const BASE_URL: &str = "http://localhost:5000";
pub const REGION: &str = "eu-west-1";
pub const BUCKET: &str = "docs-bucket";

/// In-memory metadata store handing out sequential ids.
#[derive(Default)]
pub struct FakeMetadataStore {
    records: Mutex<Vec<FileRecord>>,
    next_id: AtomicI32,
    pub fail_create: bool,
    pub fail_list: bool,
    pub create_calls: AtomicUsize,
}

impl FakeMetadataStore {
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn unlistable() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataStore for FakeMetadataStore {
    async fn create_file(&self, origin_url: &str, filename: &str) -> AppResult<i32> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(AppError::persistence(format!(
                "error creating db file {}: connection refused",
                origin_url
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::seconds(id as i64);
        self.records.lock().unwrap().push(FileRecord {
            id,
            origin_url: origin_url.to_string(),
            filename: filename.to_string(),
            created_at,
        });
        Ok(id)
    }

    async fn list_files(&self) -> AppResult<Vec<FileRecord>> {
        if self.fail_list {
            return Err(AppError::persistence(
                "error listing files: connection refused",
            ));
        }
        let mut records = self.records();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Writes a fixed payload instead of touching the network.
pub struct FakeDownloader {
    pub payload: Vec<u8>,
    pub fail: bool,
    pub calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeDownloader {
    pub fn writing(len: usize) -> Self {
        let mut payload = b"%PDF-1.4\n".to_vec();
        payload.resize(len, b'x');
        Self {
            payload,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            payload: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn fetch(&self, url: &str, local_path: &Path) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), local_path.to_path_buf()));
        if self.fail {
            return Err(AppError::fetch(url, "connection reset"));
        }
        tokio::fs::write(local_path, &self.payload).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeUploader {
    pub fail: bool,
    pub calls: Mutex<Vec<i32>>,
}

impl FakeUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Uploader for FakeUploader {
    async fn upload(&self, id: i32) -> AppResult<()> {
        self.calls.lock().unwrap().push(id);
        if self.fail {
            return Err(AppError::upload(format!("files/{}/{}.pdf", API_KEY, id), "access denied"));
        }
        Ok(())
    }
}

pub fn test_config(staging_dir: &Path, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("PORT", "5000"),
        ("BASE_URL", BASE_URL),
        ("API_KEY", API_KEY),
        ("AWS_REGION", REGION),
        ("AWS_BUCKET", BUCKET),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.insert(
        "STAGING_DIR".to_string(),
        staging_dir.to_string_lossy().to_string(),
    );
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_vars(|name| vars.get(name).cloned()).unwrap()
}

/// Router wired to the given fakes plus its staging directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<FakeMetadataStore>,
    pub downloader: Arc<FakeDownloader>,
    pub uploader: Arc<FakeUploader>,
    pub staging: TempDir,
}

impl TestApp {
    pub fn new(store: FakeMetadataStore, downloader: FakeDownloader, uploader: FakeUploader) -> Self {
        Self::with_config(store, downloader, uploader, &[])
    }

    pub fn with_config(
        store: FakeMetadataStore,
        downloader: FakeDownloader,
        uploader: FakeUploader,
        extra: &[(&str, &str)],
    ) -> Self {
        let staging = TempDir::new().unwrap();
        let config = test_config(staging.path(), extra);
        let store = Arc::new(store);
        let downloader = Arc::new(downloader);
        let uploader = Arc::new(uploader);

        let pipeline = IngestionPipeline::new(
            store.clone(),
            downloader.clone(),
            uploader.clone(),
            LinkDeriver::from_config(&config),
            config.staging_dir.clone(),
        )
        .with_fail_on_upload_error(config.fail_on_upload_error);

        let router = create_router(AppState::new(config, store.clone(), pipeline));

        Self {
            router,
            store,
            downloader,
            uploader,
            staging,
        }
    }

    pub fn happy() -> Self {
        Self::new(
            FakeMetadataStore::default(),
            FakeDownloader::writing(100),
            FakeUploader::default(),
        )
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
