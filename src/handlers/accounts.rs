use axum::{Json, extract::State};
use serde::Deserialize;

use crate::db::Profile;
use crate::middleware::{JsonBody, PathParam};
use crate::{ApiError, router::AppState};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

fn required(field: Option<String>) -> Result<String, ApiError> {
    field
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::IncorrectForm)
}

/// POST /signin -> profile of the matching account.
pub async fn signin_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignInRequest>,
) -> Result<Json<Profile>, ApiError> {
    let email = required(req.email)?;
    let password = required(req.password)?;
    let profile = state.accounts.sign_in(&email, &password).await?;
    Ok(Json(profile))
}

/// POST /register -> the freshly created profile.
pub async fn register_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<Profile>, ApiError> {
    let email = required(req.email)?;
    let name = required(req.name)?;
    let password = required(req.password)?;
    let profile = state.accounts.register(&email, &name, &password).await?;
    Ok(Json(profile))
}

/// GET /profile/{id}
pub async fn profile_handler(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.accounts.profile(id).await?))
}
