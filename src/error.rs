use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("Incorrect form submission")]
    IncorrectForm,

    #[error("{0}")]
    Validation(String),

    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Unable to register")]
    UnableToRegister,

    #[error("Unable to get user")]
    UnableToGetUser,

    #[error("User not found")]
    UserNotFound,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Invalid image input: {0}")]
    InvalidImageInput(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),
}

impl ApiError {
    /// Unique-constraint violations on insert mean the email is already taken.
    pub fn from_register(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::UnableToRegister
            }
            SqlxError::Database(db_err) if db_err.is_foreign_key_violation() => {
                ApiError::UnableToRegister
            }
            _ => ApiError::Database(err),
        }
    }

    fn status_and_body(&self) -> (StatusCode, ApiErrorBody) {
        match self {
            ApiError::IncorrectForm => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("INCORRECT_FORM", "Incorrect form submission"),
            ),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("INVALID_INPUT", msg),
            ),
            ApiError::WrongCredentials => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("WRONG_CREDENTIALS", "Wrong credentials"),
            ),
            ApiError::UnableToRegister => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("UNABLE_TO_REGISTER", "Unable to register"),
            ),
            ApiError::UnableToGetUser => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("UNABLE_TO_GET_USER", "Unable to get user"),
            ),
            ApiError::UserNotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody::new("NOT_FOUND", "Not found"),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiErrorBody::new("PAYLOAD_TOO_LARGE", "request body too large"),
            ),
            ApiError::InvalidImageInput(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("INVALID_IMAGE", msg),
            ),
            ApiError::UrlParse(_) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("INVALID_IMAGE", "Image input is not a valid URL."),
            ),
            ApiError::Database(_) | ApiError::PasswordHash(_) | ApiError::TaskJoin(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new("INTERNAL_ERROR", "An internal server error occurred."),
            ),
            ApiError::Reqwest(_) | ApiError::Json(_) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody::new("BAD_GATEWAY", "Unable to work with the detection API."),
            ),
            ApiError::UpstreamStatus(code) => {
                let (err_code, msg) = match *code {
                    StatusCode::TOO_MANY_REQUESTS => {
                        ("RATE_LIMIT", "Upstream rate limit exceeded.")
                    }
                    StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Upstream authentication failed."),
                    StatusCode::FORBIDDEN => ("FORBIDDEN", "Upstream permission denied."),
                    StatusCode::NOT_FOUND => ("NOT_FOUND", "Upstream resource not found."),
                    _ => ("UPSTREAM_ERROR", "An upstream error occurred."),
                };
                (*code, ApiErrorBody::new(err_code, msg))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = self.status_and_body();
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiErrorBody {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
