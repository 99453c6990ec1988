//! Configuration management for the Suno proxy.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. The session cookie and session identifier are copied
//! from a logged-in browser session; everything else has a sensible default.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the current working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

pub use crate::management::CredentialConfig;

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_CLERK_URL: &str = "https://clerk.suno.com";
const DEFAULT_CLERK_JS_VERSION: &str = "5.103.1";
const DEFAULT_SUNO_API_URL: &str = "https://studio-api.prod.suno.com";
const DEFAULT_RENEWAL_TIMEOUT_SECS: u64 = 30;

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory (`sunoproxy/` under the platform data dir)
/// if needed and loads its `.env` file, then loads a `.env` from the working
/// directory. Both files are optional; variables already present in the
/// environment are never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/sunoproxy/.env`
/// - macOS: `~/Library/Application Support/sunoproxy/.env`
/// - Windows: `%LOCALAPPDATA%/sunoproxy/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    dotenv::dotenv().ok();
    Ok(())
}

/// Platform data directory used for the `.env` file and the `.env.example` copy.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sunoproxy");
    path
}

/// Returns the address the proxy server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the browser session cookie string (`COOKIE`).
///
/// An empty string is returned when unset; the issuance endpoint will then
/// reject the renewal with an upstream error.
pub fn session_cookie() -> String {
    env::var("COOKIE").unwrap_or_default()
}

/// Returns the Clerk session identifier (`SESSION_ID`), if configured.
///
/// Absence is not reported here. It surfaces as a configuration error the
/// first time a token renewal is attempted.
pub fn session_id() -> Option<String> {
    non_empty_var("SESSION_ID")
}

/// Returns the configured device identifier (`DEVICE_ID`), if any.
pub fn device_id() -> Option<String> {
    non_empty_var("DEVICE_ID")
}

/// Returns the base URL of the token issuance service (`CLERK_URL`).
pub fn clerk_url() -> String {
    env::var("CLERK_URL").unwrap_or_else(|_| DEFAULT_CLERK_URL.to_string())
}

/// Returns the Clerk JS version sent with issuance requests (`CLERK_JS_VERSION`).
pub fn clerk_js_version() -> String {
    env::var("CLERK_JS_VERSION").unwrap_or_else(|_| DEFAULT_CLERK_JS_VERSION.to_string())
}

/// Returns the base URL of the Suno studio API (`SUNO_API_URL`).
pub fn suno_api_url() -> String {
    env::var("SUNO_API_URL").unwrap_or_else(|_| DEFAULT_SUNO_API_URL.to_string())
}

/// Returns the upper bound for a single renewal request (`RENEWAL_TIMEOUT_SECS`).
///
/// `0` disables the bound. Unparseable values fall back to the default.
pub fn renewal_timeout() -> Option<Duration> {
    let secs = env::var("RENEWAL_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RENEWAL_TIMEOUT_SECS);

    (secs > 0).then(|| Duration::from_secs(secs))
}

impl CredentialConfig {
    /// Collects the credential settings from the environment.
    pub fn from_env() -> Self {
        Self {
            cookie: session_cookie(),
            session_id: session_id(),
            device_id: device_id(),
            issuer_url: clerk_url(),
            clerk_js_version: clerk_js_version(),
            renewal_timeout: renewal_timeout(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
