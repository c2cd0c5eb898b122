use crate::config::{CorsConfig, RateLimitConfig, ServerConfig};
use crate::error::{AppError, AppResult};
use crate::middleware::{request_id_middleware, ClientIpKeyExtractor};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::url_handlers;
use super::AppState;

/// Create application router
pub fn create_router(
    state: Arc<AppState>,
    server_config: &ServerConfig,
    cors_config: &CorsConfig,
    rate_limit_config: &RateLimitConfig,
) -> AppResult<Router> {
    // Create endpoints; the /api/url paths serve the existing front end.
    // Valid codes can spell these segments, so GET on them redirects.
    let create_routes = Router::new()
        .route(
            "/create",
            post(url_handlers::create_url).get(url_handlers::resolve_static_segment),
        )
        .route("/create-custom", post(url_handlers::create_custom_url))
        .route(
            "/api/url/shorten",
            post(url_handlers::create_url).get(url_handlers::resolve_static_segment),
        )
        .route(
            "/api/url/custom",
            post(url_handlers::create_custom_url).get(url_handlers::resolve_static_segment),
        );

    let redirect_routes = Router::new()
        .route("/{code}", get(url_handlers::resolve_url))
        .route("/api/url/{code}", get(url_handlers::resolve_url));

    let (create_routes, redirect_routes) = if rate_limit_config.enabled {
        let governor_layer_strict = GovernorLayer::new(
            GovernorConfigBuilder::default()
                .period(rate_limit_config.strict_period())
                .burst_size(rate_limit_config.burst_size)
                .key_extractor(ClientIpKeyExtractor)
                .finish()
                .ok_or_else(|| {
                    AppError::Configuration("Failed to build strict rate limiter".to_string())
                })?,
        );

        // Redirects get twice the budget
        let governor_layer_lenient = GovernorLayer::new(
            GovernorConfigBuilder::default()
                .period(rate_limit_config.lenient_period())
                .burst_size(rate_limit_config.lenient_burst_size())
                .key_extractor(ClientIpKeyExtractor)
                .finish()
                .ok_or_else(|| {
                    AppError::Configuration("Failed to build lenient rate limiter".to_string())
                })?,
        );

        (
            create_routes.layer(governor_layer_strict),
            redirect_routes.layer(governor_layer_lenient),
        )
    } else {
        (create_routes, redirect_routes)
    };

    // Health check endpoint (no rate limiting)
    let health_routes = Router::new().route("/_health", get(health::health_check));

    let cors = if cors_config.allows_any() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = cors_config.origin_values().map_err(AppError::Configuration)?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let router = create_routes
        .merge(redirect_routes)
        .merge(health_routes)
        .fallback(url_handlers::route_not_found)
        .layer(RequestBodyLimitLayer::new(server_config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(router)
}
