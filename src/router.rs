use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::DetectionSettings;
use crate::handlers::{self, accounts, image};
use crate::service::AccountService;

/// Everything a request handler needs, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub client: reqwest::Client,
    pub detection: Arc<DetectionSettings>,
    pub body_limit: usize,
    pub cors_origins: Arc<[String]>,
}

impl AppState {
    pub fn new(
        accounts: AccountService,
        client: reqwest::Client,
        detection: DetectionSettings,
        body_limit: usize,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            accounts,
            client,
            detection: Arc::new(detection),
            body_limit,
            cors_origins: cors_origins.into(),
        }
    }
}

/// Empty origin list means any origin, like a bare `cors()` middleware.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        info!("CORS: allowing any origin");
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| {
            HeaderValue::from_str(o)
                .inspect_err(|e| warn!(origin = %o, error = %e, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    info!(count = parsed.len(), "CORS: restricting to configured origins");
    base.allow_origin(parsed)
}

pub fn smart_brain_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    let body_limit = state.body_limit;

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/signin", post(accounts::signin_handler))
        .route("/register", post(accounts::register_handler))
        .route("/profile/{id}", get(accounts::profile_handler))
        .route("/imageurl", post(image::imageurl_handler))
        .route("/image", put(image::image_handler))
        .route("/detect", post(image::detect_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
