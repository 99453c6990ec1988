//! Suno Proxy Library
//!
//! This library provides a small REST proxy in front of the Suno studio API. It
//! keeps a session-backed bearer token fresh, forwards generation, feed, billing
//! and download requests, and wraps upstream responses into a uniform envelope.
//!
//! # Modules
//!
//! - `api` - HTTP handlers exposed by the proxy server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared across the crate
//! - `management` - Credential lifecycle (token cache, renewal, cookies, clock)
//! - `server` - Router construction and the HTTP listener
//! - `suno` - Suno studio API client and audio helpers
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sunoproxy::{config, management::CredentialManager, suno::SunoClient};
//!
//! #[tokio::main]
//! async fn main() -> sunoproxy::Res<()> {
//!     config::load_env().await?;
//!     let credentials = Arc::new(CredentialManager::new(config::CredentialConfig::from_env()));
//!     let client = SunoClient::new(config::suno_api_url(), credentials);
//!     println!("{}", client.billing_info().await?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod suno;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI glue where errors of different kinds are only reported,
/// never matched on. Library code returns the typed errors from [`error`].
///
/// # Example
///
/// ```
/// use sunoproxy::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Renewing session token...");
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Token renewed");
/// success!("Downloaded {} clips", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only CLI commands use this. Server code paths report failures through
/// [`api::ApiError`] and keep the process alive.
///
/// # Example
///
/// ```
/// error!("Failed to bind {}", addr);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Could not decode token claims: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
