use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Provenance of one submitted document.
///
/// Rows are only ever inserted. A record may outlive a failed download or
/// upload; nothing ties its existence to the staged file or the stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRecord {
    pub id: i32,
    pub origin_url: String,
    pub filename: String,
    pub created_at: NaiveDateTime,
}
