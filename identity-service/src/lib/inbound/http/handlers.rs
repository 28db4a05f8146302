use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::credential::errors::AuthError;

pub mod current_identity;
pub mod login;
pub mod not_found;
pub mod register;

/// Successful response; the payload is the JSON body as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, T);

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, data)
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "Unhandled error");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let mut response = (status, Json(ApiErrorData::new(status, message))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::AuthenticationRequired => ApiError::Unauthorized(err.to_string()),
            AuthError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            AuthError::DuplicateUsername(_) => ApiError::Conflict(err.to_string()),
            AuthError::InvalidUsername(_) => ApiError::BadRequest(err.to_string()),
            AuthError::Password(_)
            | AuthError::TokenIssuance(_)
            | AuthError::Store(_)
            | AuthError::Unknown(_) => {
                // Details stay in the logs.
                tracing::error!(error = %err, "Authentication infrastructure failure");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

/// Error body: numeric code, reason phrase and a message safe to show callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: String,
    pub status: String,
    pub message: String,
}

impl ApiErrorData {
    pub fn new(status_code: StatusCode, message: String) -> Self {
        Self {
            code: status_code.as_u16().to_string(),
            status: status_code
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            message,
        }
    }
}
