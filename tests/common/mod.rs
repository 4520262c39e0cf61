#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, Response, StatusCode},
    routing::post,
};
use serde_json::Value;
use smart_brain_api::AccountService;
use smart_brain_api::api::{DetectionSettings, build_http_client};
use smart_brain_api::config::Config;
use smart_brain_api::db::{AccountStorage, connect};
use smart_brain_api::router::{AppState, smart_brain_router};
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

/// Temporary SQLite file removed on drop.
pub struct TempDb {
    pub path: PathBuf,
    pub url: String,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "smart-brain-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let url = format!("sqlite:{}", path.display());
        Self { path, url }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = fs::remove_file(side);
        }
    }
}

pub async fn account_service(db: &TempDb) -> AccountService {
    let pool = connect(&db.url, 5).await.expect("failed to open database");
    let storage = AccountStorage::new(pool);
    storage.init_schema().await.expect("failed to init schema");
    AccountService::new(storage)
}

/// Router wired to a temp database. The detection API points at a closed local
/// port so outbound calls fail fast instead of reaching the network.
pub async fn test_app(db: &TempDb) -> (Router, AccountService) {
    let closed: Url = "http://127.0.0.1:9/".parse().expect("valid url");
    test_app_with_upstream(db, closed).await
}

pub async fn test_app_with_upstream(db: &TempDb, detection_base: Url) -> (Router, AccountService) {
    let accounts = account_service(db).await;
    let cfg = Config {
        detection_api_base: detection_base,
        detection_pat: "test-pat".to_string(),
        body_limit_bytes: 64 * 1024,
        ..Config::default()
    };
    let state = AppState::new(
        accounts.clone(),
        build_http_client(&cfg).expect("failed to build client"),
        DetectionSettings::from_config(&cfg).expect("valid detection settings"),
        cfg.body_limit_bytes,
        cfg.cors_origins.clone(),
    );
    (smart_brain_router(state), accounts)
}

/// What the fake detection API last received.
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Local stand-in for the detection API: answers every predict call on the
/// default model path with `status` and `body`.
pub async fn spawn_detection_upstream(
    status: StatusCode,
    body: Value,
) -> (Url, Arc<Mutex<SeenRequest>>) {
    let seen = Arc::new(Mutex::new(SeenRequest::default()));
    let recorder = seen.clone();

    let app = Router::new().route(
        "/v2/models/face-detection/outputs",
        post(move |headers: HeaderMap, Json(req): Json<Value>| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                {
                    let mut last = recorder.lock().expect("recorder lock poisoned");
                    last.authorization = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    last.body = Some(req);
                }
                (status, Json(body))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake upstream");
    let addr = listener.local_addr().expect("fake upstream has no address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base = format!("http://{addr}/").parse().expect("valid url");
    (base, seen)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    app.clone().oneshot(request).await.expect("request failed")
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not json")
}
