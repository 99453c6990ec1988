use std::{net::SocketAddr, str::FromStr};

use crate::{cli, config, error, server, warning};

pub async fn serve(addr: Option<String>) {
    let addr = addr.unwrap_or_else(config::server_addr);
    let addr = match SocketAddr::from_str(&addr) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address '{}': {}", addr, e),
    };

    let client = cli::suno_client();
    if client.credentials().session_id().is_none() {
        warning!("SESSION_ID is not set. Every upstream call will fail until it is configured.");
    }

    if let Err(e) = server::start_api_server(addr, client).await {
        error!("Server stopped. Err: {}", e);
    }
}
