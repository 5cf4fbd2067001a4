//! Route configuration and setup.

use crate::handlers::{
    health::{liveness_check, readiness_check},
    images::{delete_image, list_images},
    upload::upload_image,
};
use crate::middleware::{get_request_id, request_id_middleware};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{delete, get, post},
    Router,
};
use galleria_core::{Config, StorageBackend};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(body_limit, "Request body limit configured");

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %get_request_id(request).unwrap_or("-"),
        )
    });

    let api_routes = Router::new()
        .route("/api/upload", post(upload_image))
        .route("/api/images", get(list_images))
        .route("/api/images/{file}", delete(delete_image))
        .layer(DefaultBodyLimit::max(body_limit));

    let health_routes = Router::new()
        .route("/health", get(liveness_check))
        .route("/health/ready", get(readiness_check));

    let mut app = api_routes.merge(health_routes).with_state(state);

    if config.storage_backend() == StorageBackend::Local {
        app = mount_local_storage(app, config);
    }

    let app = app
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

/// Path component of the public base URL, e.g. `/uploads` for both
/// `/uploads` and `http://localhost:4000/uploads/`.
pub fn public_mount_path(base_url: &str) -> String {
    let path = match base_url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => base_url,
    };

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Serve the local storage directory read-only under its public mount.
fn mount_local_storage(app: Router, config: &Config) -> Router {
    let mount = public_mount_path(config.local_storage_base_url());
    let serve_dir = ServeDir::new(config.local_storage_path());

    tracing::info!(
        mount = %mount,
        path = %config.local_storage_path(),
        "Serving local storage"
    );

    if mount == "/" {
        app.fallback_service(serve_dir)
    } else {
        app.nest_service(&mount, serve_dir)
    }
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
