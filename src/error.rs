//! Error types for the credential core and the upstream client.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of [`crate::management::CredentialManager::get_token`].
///
/// The type is `Clone` so that callers queued behind a failed renewal can
/// receive the same failure instead of starting another renewal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// A required identifier is not configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The issuance endpoint answered with a non-success status.
    #[error("token issuance failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The issuance endpoint answered 2xx but the body is unusable.
    #[error("token issuance returned a malformed response: {0}")]
    MalformedResponse(String),

    /// Network failure or timeout while talking to the issuance endpoint.
    #[error("token issuance request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for CredentialError {
    fn from(err: reqwest::Error) -> Self {
        CredentialError::Transport(err.to_string())
    }
}

/// Token claims could not be read. Never leaves the credential manager.
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token is not made of dot separated segments")]
    Malformed,

    #[error("claims segment is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("claims segment is not JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of calls to the Suno studio API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("WAV file for {clip_id} not ready after {attempts} attempts")]
    WavNotReady { clip_id: String, attempts: u32 },

    #[error("cannot write file: {0}")]
    Io(#[from] std::io::Error),
}
