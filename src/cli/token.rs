use crate::{cli, error, info, success, utils};

/// Renews (or reuses) the session token and prints it.
///
/// Useful to check that `COOKIE` and `SESSION_ID` are still accepted before
/// starting the server, and to grab a token for manual requests.
pub async fn token() {
    let client = cli::suno_client();
    let credentials = client.credentials();

    let token = match credentials.get_token().await {
        Ok(token) => token,
        Err(e) => error!("Cannot obtain a session token. Err: {}", e),
    };

    info!("Device ID: {}", credentials.device_id());
    match credentials.cached_token().await.and_then(|t| t.expires_at) {
        Some(exp) => info!("Expires at: {}", utils::format_timestamp(exp)),
        None => info!("Expires at: unknown"),
    }

    success!("Token obtained");
    println!("{}", token);
}
