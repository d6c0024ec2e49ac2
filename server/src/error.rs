//! HTTP-facing errors.
//!
//! Every handler failure becomes an `ApiError`, rendered as a status code
//! with a `{"message": ...}` body. Not-found responses carry the same body
//! whether the task is missing or owned by someone else. Internal failures
//! are logged here and reported to the client without detail.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tasklist_core::{AuthError, TaskError};
use thiserror::Error;
use tracing::error;

use crate::oauth::OAuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("task not found")]
    NotFound,

    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("user information not found")]
    MissingIdentity,

    #[error("google login is not configured")]
    LoginUnavailable,

    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized | ApiError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ApiError::MissingIdentity => StatusCode::BAD_REQUEST,
            ApiError::LoginUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        let mut response = (status, Json(ErrorBody { message })).into_response();
        if matches!(self, ApiError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<TaskError> for ApiError {
    fn from(error: TaskError) -> Self {
        match error {
            TaskError::NotFound(_) => ApiError::NotFound,
            TaskError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl From<OAuthError> for ApiError {
    fn from(error: OAuthError) -> Self {
        match error {
            OAuthError::InvalidState | OAuthError::Denied(_) => ApiError::AuthenticationFailed,
            OAuthError::MissingIdentity => ApiError::MissingIdentity,
            OAuthError::Url(_) | OAuthError::Provider(_) => ApiError::Internal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tasklist_core::StoreError;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn task_errors_map_to_status_codes() {
        assert_eq!(ApiError::from(TaskError::NotFound(Uuid::nil())).status(), StatusCode::NOT_FOUND);
        let store = TaskError::Store(StoreError::Unavailable("down".to_string()));
        assert_eq!(ApiError::from(store).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn oauth_errors_map_to_status_codes() {
        assert_eq!(ApiError::from(OAuthError::InvalidState).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(OAuthError::Denied("access_denied".to_string())).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::from(OAuthError::MissingIdentity).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_sets_challenge_header() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn internal_error_hides_detail() {
        let response = ApiError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
