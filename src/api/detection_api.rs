use crate::config::Config;
use crate::error::ApiError;
use crate::types::detection::{ImageSource, PredictRequest};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Resolved settings for the face-detection model endpoint.
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    pub outputs_url: Url,
    pub pat: String,
    pub user_id: String,
    pub app_id: String,
}

impl DetectionSettings {
    pub fn from_config(cfg: &Config) -> Result<Self, url::ParseError> {
        let mut path = format!("v2/models/{}", cfg.detection_model_id);
        if let Some(version) = cfg.detection_model_version.as_deref() {
            path.push_str("/versions/");
            path.push_str(version);
        }
        path.push_str("/outputs");

        Ok(Self {
            outputs_url: cfg.detection_api_base.join(&path)?,
            pat: cfg.detection_pat.clone(),
            user_id: cfg.detection_user_id.clone(),
            app_id: cfg.detection_app_id.clone(),
        })
    }
}

/// Shared outbound client. Honors `proxy` from the config.
pub fn build_http_client(cfg: &Config) -> Result<reqwest::Client, ApiError> {
    let mut builder = reqwest::Client::builder()
        .user_agent("smart-brain-api/0.1".to_string())
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30));
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}

/// Stateless face-detection API caller. Failures are returned, never retried.
pub struct DetectionApi;

impl DetectionApi {
    pub async fn predict(
        client: &reqwest::Client,
        settings: &DetectionSettings,
        image: &ImageSource,
    ) -> Result<Value, ApiError> {
        let body = PredictRequest::single(&settings.user_id, &settings.app_id, image);

        let resp = client
            .post(settings.outputs_url.clone())
            .header(AUTHORIZATION, format!("Key {}", settings.pat))
            .json(&body)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "detection API unreachable"))?;

        let status = resp.status();
        if !status.is_success() {
            error!(%status, "detection API returned an error status");
            return Err(ApiError::UpstreamStatus(status));
        }

        let value: Value = resp
            .json()
            .await
            .inspect_err(|e| error!(error = %e, "detection API returned an unreadable body"))?;
        info!(%status, "detection API call completed");
        Ok(value)
    }
}
