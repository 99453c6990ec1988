use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{
    error::{ClientError, CredentialError},
    warning,
};

/// Failure of a proxy route, rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable session token; the proxy cannot serve anything right now.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Client(ClientError),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Credential(e) => ApiError::Credential(e),
            other => ApiError::Client(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Credential(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warning!("Request failed with {}: {}", status, self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
