//! Wire types for the external face-detection API.
//!
//! Only the fields this service reads are modelled; the raw JSON is what
//! `/imageurl` hands back to the caller.

use crate::error::ApiError;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

/// Image to run detection on: a remote URL or inline base64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Url(String),
    Base64(String),
}

impl ImageSource {
    /// Accepts an `http(s)` URL or a `data:<mime>;base64,<payload>` URL.
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ApiError::IncorrectForm);
        }

        if let Some(rest) = input.strip_prefix("data:") {
            let Some((_mime, payload)) = rest.split_once(";base64,") else {
                return Err(ApiError::InvalidImageInput(
                    "data URL must be base64 encoded".to_string(),
                ));
            };
            base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| ApiError::InvalidImageInput(format!("bad base64 payload: {e}")))?;
            return Ok(Self::Base64(payload.to_string()));
        }

        let url = Url::parse(input)?;
        match url.scheme() {
            "http" | "https" => Ok(Self::Url(url.as_str().to_string())),
            other => Err(ApiError::InvalidImageInput(format!(
                "unsupported url scheme `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserAppId<'a> {
    pub user_id: &'a str,
    pub app_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InputData<'a> {
    pub image: &'a ImageSource,
}

#[derive(Debug, Serialize)]
pub struct Input<'a> {
    pub data: InputData<'a>,
}

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub user_app_id: UserAppId<'a>,
    pub inputs: Vec<Input<'a>>,
}

impl<'a> PredictRequest<'a> {
    pub fn single(user_id: &'a str, app_id: &'a str, image: &'a ImageSource) -> Self {
        Self {
            user_app_id: UserAppId { user_id, app_id },
            inputs: vec![Input {
                data: InputData { image },
            }],
        }
    }
}

/// Box edges as fractions of the image size. `right_col`/`bottom_row` are
/// measured from the left/top edge, like `left_col`/`top_row`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedBox {
    #[serde(default)]
    pub left_col: f64,
    #[serde(default)]
    pub top_row: f64,
    #[serde(default)]
    pub right_col: f64,
    #[serde(default)]
    pub bottom_row: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionInfo {
    pub bounding_box: Option<NormalizedBox>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub region_info: RegionInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputData {
    #[serde(default)]
    pub regions: Option<Vec<Region>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub data: OutputData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionStatus {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub status: Option<DetectionStatus>,
    #[serde(default)]
    pub outputs: Option<Vec<Output>>,
}

impl DetectionResponse {
    /// A response counts as a successful detection once it carries outputs,
    /// even if no face was found.
    pub fn has_outputs(&self) -> bool {
        self.outputs.is_some()
    }

    /// Boxes of the first output, in response order. Regions without a box are skipped.
    pub fn face_boxes(&self) -> Vec<NormalizedBox> {
        let Some(regions) = self
            .outputs
            .as_ref()
            .and_then(|outputs| outputs.first())
            .and_then(|output| output.data.regions.as_ref())
        else {
            return Vec::new();
        };

        regions
            .iter()
            .filter_map(|region| region.region_info.bounding_box)
            .collect()
    }
}
