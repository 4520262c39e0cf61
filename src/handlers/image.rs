use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::DetectionApi;
use crate::middleware::JsonBody;
use crate::service::{FaceBox, face_locations};
use crate::types::detection::{DetectionResponse, ImageSource};
use crate::{ApiError, router::AppState};

#[derive(Debug, Deserialize)]
pub struct ImageUrlRequest {
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntriesRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: i64,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub input: Option<String>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub boxes: Vec<FaceBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<i64>,
}

/// Overlay boxes only make sense for an image with a real on-screen size.
fn check_dimensions(width: f64, height: f64) -> Result<(), ApiError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if positive(width) && positive(height) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Image width and height must be positive.".to_string(),
        ))
    }
}

fn image_source(input: Option<String>) -> Result<ImageSource, ApiError> {
    ImageSource::parse(input.as_deref().unwrap_or_default())
}

/// POST /imageurl -> raw detection API response.
pub async fn imageurl_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ImageUrlRequest>,
) -> Result<Json<Value>, ApiError> {
    let image = image_source(req.input)?;
    let value = DetectionApi::predict(&state.client, &state.detection, &image).await?;
    Ok(Json(value))
}

/// PUT /image -> `{ entries }` after a +1.
pub async fn image_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EntriesRequest>,
) -> Result<Json<EntriesResponse>, ApiError> {
    let entries = state.accounts.increment_entries(req.id).await?;
    info!(id = req.id, entries, "entries incremented");
    Ok(Json(EntriesResponse { entries }))
}

/// POST /detect -> overlay boxes for an image shown at `width`x`height`.
/// With `id`, a response carrying outputs also counts as one entry.
pub async fn detect_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    check_dimensions(req.width, req.height)?;
    let image = image_source(req.input)?;
    let value = DetectionApi::predict(&state.client, &state.detection, &image).await?;
    let detection: DetectionResponse = serde_json::from_value(value)?;

    let boxes = face_locations(req.width, req.height, &detection.face_boxes());

    let entries = match req.id {
        Some(id) if detection.has_outputs() => Some(state.accounts.increment_entries(id).await?),
        _ => None,
    };

    Ok(Json(DetectResponse { boxes, entries }))
}
