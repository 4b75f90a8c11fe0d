use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::post,
};
use guttersnap_model::{MAX_FILE_BYTES, SHOT_COUNT, routes};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers::submit,
    infra::{app_state::AppState, config::CorsConfig},
};

/// Room for nine full-size photos plus the text fields and multipart
/// framing. Per-file limits are enforced by the handler.
pub const REQUEST_BODY_LIMIT: usize =
    SHOT_COUNT * MAX_FILE_BYTES as usize + 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().static_dir);
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .route(
            routes::SUBMIT_REQUEST,
            post(submit::submit_request)
                .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT)),
        )
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.is_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
