//! # Suno Integration Module
//!
//! This module is the client side of the proxy: everything that talks to the
//! Suno studio API once a session token is available.
//!
//! ## Overview
//!
//! ```text
//! HTTP handlers / CLI commands
//!          ↓
//! SunoClient (headers, status mapping)
//!          ↓
//! CredentialManager::get_token (cached or renewed)
//!          ↓
//! Suno studio API
//! ```
//!
//! ## Core Modules
//!
//! - [`client`] - [`SunoClient`] with session, generation, feed, billing,
//!   audio and WAV export operations. Every request carries the bearer token, a freshly
//!   computed `browser-token` signature and the device identifier.
//! - [`audio`] - Heuristics for locating a clip and its audio URL inside feed
//!   responses whose shape is not stable, and for naming downloaded files.
//!
//! ## Error Types
//!
//! Client operations return [`crate::error::ClientError`]. Credential failures
//! are kept apart from upstream failures so the HTTP layer can answer 503 for
//! the former.

use std::time::Duration;

pub mod audio;
pub mod client;

pub use client::{SunoClient, build_generate_payload};

/// Browser user agent presented to Suno and Clerk.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";
pub const ORIGIN: &str = "https://suno.com";
pub const REFERER: &str = "https://suno.com/";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Generation endpoint used when the session does not announce one.
pub const DEFAULT_GENERATE_ENDPOINT: &str = "/api/generate/v2-web/";

/// User tier used when the session does not announce one.
pub const DEFAULT_USER_TIER: &str = "e1235dd7-9f4d-4738-aeb2-1470466cba27";

/// Pause between two WAV readiness checks.
pub const WAV_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// WAV readiness checks before giving up.
pub const WAV_POLL_ATTEMPTS: u32 = 60;
