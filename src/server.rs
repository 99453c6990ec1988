use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;

use crate::{Res, api, info, suno::SunoClient};

pub fn router(client: Arc<SunoClient>) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/generate", post(api::generate))
        .route("/feed", post(api::feed))
        .route("/feed/{clip_id}", get(api::single_feed))
        .route("/session", get(api::session))
        .route("/credits", get(api::credits))
        .route("/download/{clip_id}", get(api::download))
        .route("/download-url/{clip_id}", get(api::download_url))
        .route("/audio-info/{clip_id}", get(api::audio_info))
        .layer(Extension(client))
        .layer(CorsLayer::permissive())
}

pub async fn start_api_server(addr: SocketAddr, client: Arc<SunoClient>) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(client)).await?;
    Ok(())
}
