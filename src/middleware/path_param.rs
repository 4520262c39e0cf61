use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ApiError;

/// Path extractor whose rejections surface as `ApiError::Validation`,
/// so malformed ids get the same JSON error body as everything else.
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "rejected path parameter");
                Err(ApiError::Validation("Invalid path parameter.".to_string()))
            }
        }
    }
}
