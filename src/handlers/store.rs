use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::middleware::authorize;
use crate::models::{ApiKeyQuery, FileLinks, StoreFromTextForm, StoreQuery};
use crate::services::extract_url;
use crate::state::AppState;

/// `GET /store?url=..&api_key=..`
pub async fn store_handler(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> AppResult<Json<FileLinks>> {
    store_url(&state, &query.url, &query.api_key).await
}

/// `POST /store-from-text?api_key=..` with a `message` form field, sent either
/// urlencoded or as multipart.
///
/// A message without any PDF link (or a body that carries no readable form)
/// yields an empty 200 and nothing else runs.
pub async fn store_from_text_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiKeyQuery>,
    request: Request,
) -> Response {
    let message = read_message(request).await;

    match extract_url(&message) {
        Some(url) => store_url(&state, url, &query.api_key).await.into_response(),
        None => {
            debug!("No PDF link found in message, ignoring");
            StatusCode::OK.into_response()
        }
    }
}

async fn read_message(request: Request) -> String {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        return match Form::<StoreFromTextForm>::from_request(request, &()).await {
            Ok(Form(form)) => form.message,
            Err(rejection) => {
                debug!(error = %rejection, "No urlencoded form in request");
                String::new()
            }
        };
    }

    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable multipart request");
            return String::new();
        }
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("message") => {
                return field.text().await.unwrap_or_else(|e| {
                    warn!(error = %e, "Failed to read message field");
                    String::new()
                });
            }
            Ok(Some(_)) => continue,
            Ok(None) => return String::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read multipart field");
                return String::new();
            }
        }
    }
}

async fn store_url(state: &AppState, url: &str, api_key: &str) -> AppResult<Json<FileLinks>> {
    authorize(&state.config, api_key)?;

    info!(url = %url, "Starting ingestion request");
    let ingested = state.pipeline.ingest(url).await?;

    match &ingested.upload_error {
        None => info!(id = ingested.id, url = %url, "Document stored"),
        Some(error) => warn!(
            id = ingested.id,
            url = %url,
            error = %error,
            "Answering with a persistent link that was not written"
        ),
    }

    Ok(Json(ingested.links))
}
