use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::error::AppResult;
use crate::middleware::authorize;
use crate::models::{ApiKeyQuery, FileRecord};
use crate::state::AppState;

/// `GET /files?api_key=..`: every metadata record, newest first.
pub async fn list_files_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiKeyQuery>,
) -> AppResult<Json<Vec<FileRecord>>> {
    authorize(&state.config, &query.api_key)?;
    let files = state.store.list_files().await?;
    Ok(Json(files))
}
