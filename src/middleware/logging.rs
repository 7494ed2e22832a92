use axum::{
    extract::Request,
    http::{HeaderValue, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

/// Per-request start/finish logs tagged with an `x-request-id`.
///
/// The shared secret travels in the query string, so it is masked before the
/// URI reaches the logs.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = redacted_uri(request.uri());
    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = &header_value {
        request.headers_mut().insert("x-request-id", value.clone());
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert("x-request-id", value);
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

fn redacted_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("api_key", _)) => "api_key=<redacted>".to_string(),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", uri.path(), query)
}

#[cfg(test)]
mod tests {
    use super::redacted_uri;
    use axum::http::Uri;

    #[test]
    fn test_api_key_is_masked() {
        let uri: Uri = "/store?url=https://host/doc.pdf&api_key=SECRET".parse().unwrap();
        assert_eq!(
            redacted_uri(&uri),
            "/store?url=https://host/doc.pdf&api_key=<redacted>"
        );
    }

    #[test]
    fn test_uri_without_key_is_unchanged() {
        let uri: Uri = "/download/3.pdf".parse().unwrap();
        assert_eq!(redacted_uri(&uri), "/download/3.pdf");

        let uri: Uri = "/files?page=2".parse().unwrap();
        assert_eq!(redacted_uri(&uri), "/files?page=2");
    }
}
