use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ApiError;

/// JSON body extractor whose rejections (bad content type, malformed JSON,
/// wrong field types) surface as `ApiError::IncorrectForm`, except an
/// oversized body which stays a 413.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(body)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ApiError::PayloadTooLarge)
            }
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "rejected request body");
                Err(ApiError::IncorrectForm)
            }
        }
    }
}
