use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::FileRecord;

const CREATE_FILES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS files (
        id serial PRIMARY KEY,
        origin_url text NOT NULL,
        filename text NOT NULL,
        created_at timestamp NOT NULL DEFAULT now()
    )
"#;

/// Durable record of every submitted document.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Inserts a record and returns its freshly assigned id.
    async fn create_file(&self, origin_url: &str, filename: &str) -> AppResult<i32>;

    /// All records, newest first.
    async fn list_files(&self) -> AppResult<Vec<FileRecord>>;

    async fn ping(&self) -> AppResult<()>;
}

/// Postgres-backed metadata store.
#[derive(Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and verifies connectivity.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Unable to connect to the database: {}", e))?;

        info!(max_connections, "Database pool established");
        Ok(Self::new(pool))
    }

    /// Creates the `files` table when it does not exist yet.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(CREATE_FILES_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Error creating database table: {}", e))?;

        debug!("files table is present");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "insert"))]
    async fn create_file(&self, origin_url: &str, filename: &str) -> AppResult<i32> {
        let id = sqlx::query_scalar::<Postgres, i32>(
            "INSERT INTO files (origin_url, filename) VALUES ($1, $2) RETURNING id",
        )
        .bind(origin_url)
        .bind(filename)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::persistence(format!(
                "error creating db file {}: error inserting file {}: {}",
                origin_url, filename, e
            ))
        })?;

        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn list_files(&self) -> AppResult<Vec<FileRecord>> {
        let files = sqlx::query_as::<Postgres, FileRecord>(
            "SELECT id, origin_url, filename, created_at FROM files ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("error listing files: {}", e)))?;

        Ok(files)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("database unavailable: {}", e)))?;
        Ok(())
    }
}
