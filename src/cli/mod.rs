//! # CLI Module
//!
//! Command implementations for the `sunoproxy` binary.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP proxy (`SERVER_ADDRESS` or `--addr`)
//! - [`token`] - Renews the session token and prints it with its expiry
//! - [`credits`] - Shows the account's billing fields as a table
//! - [`clips`] - Lists downloadable clips from the account library
//! - [`download`] - Saves clips as MP3 or WAV files with a progress bar
//!
//! Every command builds its own [`SunoClient`] from the environment, so one
//! credential manager serves the whole process run.
//!
//! ## Usage Patterns
//!
//! ```bash
//! sunoproxy token                          # Check COOKIE / SESSION_ID
//! sunoproxy serve --addr 127.0.0.1:8000    # Start the proxy
//! sunoproxy clips --all                    # Whole library
//! sunoproxy download <clip-id> --dir ./downloads
//! ```
//!
//! ## Error Handling
//!
//! Commands report unrecoverable failures with the `error!` macro, which ends
//! the process. Per-item failures in batch commands are reported with
//! `warning!` and the batch continues.

use std::sync::Arc;

use crate::{
    config::{self, CredentialConfig},
    management::CredentialManager,
    suno::SunoClient,
};

mod credits;
mod library;
mod serve;
mod token;

pub use credits::credits;
pub use library::clips;
pub use library::download;
pub use serve::serve;
pub use token::token;

fn suno_client() -> Arc<SunoClient> {
    let credentials = Arc::new(CredentialManager::new(CredentialConfig::from_env()));
    Arc::new(SunoClient::new(config::suno_api_url(), credentials))
}
