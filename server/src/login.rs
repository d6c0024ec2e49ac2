//! Google login endpoints that end in a bearer token.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::oauth::OAuthError;
use crate::AppState;

/// Query string Google appends when redirecting back.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub user_id: String,
}

pub async fn google_login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let google = state.google.as_ref().ok_or(ApiError::LoginUnavailable)?;
    let url = google.begin().await?;
    Ok(Redirect::to(url.as_str()))
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<LoginResponse>, ApiError> {
    let google = state.google.as_ref().ok_or(ApiError::LoginUnavailable)?;

    if let Some(reason) = params.error {
        if let Some(login) = &params.state {
            google.take_state(login).await.ok();
        }
        warn!(%reason, "google login refused");
        return Err(OAuthError::Denied(reason).into());
    }
    let (Some(login), Some(code)) = (params.state, params.code) else {
        return Err(ApiError::AuthenticationFailed);
    };

    let identity = google.complete(&login, &code).await.map_err(|error| {
        warn!(%error, "google login failed");
        ApiError::from(error)
    })?;
    let token = state.issuer.issue(&identity.user_id, &identity.email)?;
    info!(user_id = %identity.user_id, "issued bearer token");

    Ok(Json(LoginResponse {
        token,
        email: identity.email,
        user_id: identity.user_id,
    }))
}
