use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::AuthResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, AuthResponseData { token: token.0 }))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    username: String,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let username = Username::new(self.username).map_err(AuthError::from)?;

        if self.password.is_empty() {
            return Err(ApiError::BadRequest(
                "Password must not be empty".to_string(),
            ));
        }

        Ok(RegisterCommand::new(username, self.password))
    }
}
