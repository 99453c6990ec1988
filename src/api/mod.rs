//! # API Module
//!
//! HTTP handlers exposed by the proxy server.
//!
//! ## Overview
//!
//! Every data route resolves a session token through the shared
//! [`crate::suno::SunoClient`], forwards the call to Suno and wraps the upstream
//! JSON into the [`crate::types::ApiResponse`] envelope:
//!
//! ```json
//! { "code": 0, "msg": "success", "data": { ... } }
//! ```
//!
//! ## Endpoints
//!
//! ### Monitoring
//!
//! - [`root`] - `GET /`, service name and version
//! - [`health`] - `GET /health`
//!
//! ### Songs
//!
//! - [`generate`] - `POST /generate`, text-to-song generation
//! - [`feed`] - `POST /feed`, clips by a list of ids
//! - [`single_feed`] - `GET /feed/{clip_id}`
//!
//! ### Account
//!
//! - [`session`] - `GET /session`
//! - [`credits`] - `GET /credits`
//!
//! ### Audio
//!
//! - [`download`] - `GET /download/{clip_id}`, streamed `audio/mpeg`
//! - [`download_url`] - `GET /download-url/{clip_id}`
//! - [`audio_info`] - `GET /audio-info/{clip_id}`
//!
//! ## Errors
//!
//! Handlers return [`ApiError`], rendered as `{"detail": "..."}`. Token
//! failures answer `503 Service Unavailable`, unknown clips `404`, and any
//! other upstream failure `500`.

mod account;
mod download;
mod error;
mod health;
mod songs;

pub use account::{credits, session};
pub use download::{audio_info, download, download_url};
pub use error::ApiError;
pub use health::{health, root};
pub use songs::{feed, generate, single_feed};
