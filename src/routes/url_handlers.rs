use crate::error::{AppError, AppResult};
use crate::models::{CreateCustomUrlRequest, ShortenedUrl};
use crate::services::validation::is_valid_short_code;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use std::sync::Arc;
use url::Url as UrlParser;

use super::AppState;

/// Create a short URL under a generated code.
///
/// The body is the original URL, either raw or as a JSON string literal.
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    body: String,
) -> AppResult<Json<ShortenedUrl>> {
    let original_url = url_from_body(&body)?;
    let response = state.shortener.auto_shorten(&original_url).await?;
    Ok(Json(response))
}

/// Create a short URL under a caller-chosen code
pub async fn create_custom_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCustomUrlRequest>, JsonRejection>,
) -> AppResult<Json<ShortenedUrl>> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(operation = "custom_shorten", error = %rejection, "Rejected request body");
        AppError::InvalidRequest(rejection.body_text())
    })?;

    let response = state
        .shortener
        .custom_shorten(&payload.original_url, &payload.custom_code)
        .await?;
    Ok(Json(response))
}

/// Resolve a short URL and redirect
pub async fn resolve_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> AppResult<Response> {
    // Anything without the short code shape is not ours to answer.
    if !is_valid_short_code(&code) {
        return Ok(route_not_found().await.into_response());
    }

    let original_url = state.resolver.resolve(&code).await?;
    found(&original_url)
}

/// Resolve a code that shares its path with a create endpoint.
///
/// `GET /create` and friends land on the static POST routes, so the last path
/// segment is taken as the code.
pub async fn resolve_static_segment(
    state: State<Arc<AppState>>,
    uri: Uri,
) -> AppResult<Response> {
    let code = uri.path().rsplit('/').next().unwrap_or_default().to_string();
    resolve_url(state, Path(code)).await
}

/// Fallback for paths no route matches
pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NOT_FOUND",
            "message": "No route matches this path",
        })),
    )
}

/// Accept a raw URL or a JSON-encoded string holding one
fn url_from_body(body: &str) -> AppResult<String> {
    let trimmed = body.trim();
    if trimmed.starts_with('"') {
        serde_json::from_str::<String>(trimmed)
            .map_err(|_| AppError::InvalidUrl("Invalid URL format".to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Build a 302 response pointing at `location`
fn found(location: &str) -> AppResult<Response> {
    // Header values must be ASCII, so anything else goes out percent-encoded.
    let target = if location.is_ascii() {
        location.to_string()
    } else {
        UrlParser::parse(location)
            .map_err(|e| AppError::Internal(format!("Stored URL does not parse: {}", e)))?
            .to_string()
    };

    let value = HeaderValue::from_str(&target)
        .map_err(|e| AppError::Internal(format!("Unusable redirect target: {}", e)))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, value)]).into_response())
}
