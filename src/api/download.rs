use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Body,
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    api::ApiError,
    suno::{SunoClient, audio},
    types::ApiResponse,
};

/// Relays the audio file of a clip as an attachment.
///
/// The upstream status is checked before any byte is sent, so a failing CDN
/// turns into an error response instead of a truncated body.
pub async fn download(
    Extension(client): Extension<Arc<SunoClient>>,
    Path(clip_id): Path<String>,
) -> Result<Response, ApiError> {
    let audio_url = client
        .audio_url(&clip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Audio not found for clip ID: {}", clip_id)))?;

    let upstream = client.open_audio(&audio_url).await?;
    let filename = audio::download_filename(&audio_url, &clip_id);

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

pub async fn download_url(
    Extension(client): Extension<Arc<SunoClient>>,
    Path(clip_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let audio_url = client.audio_url(&clip_id).await?.ok_or_else(|| {
        ApiError::NotFound(format!("Audio URL not found for clip ID: {}", clip_id))
    })?;

    Ok(Json(ApiResponse::success(json!({
        "audio_url": audio_url,
        "clip_id": clip_id,
    }))))
}

/// Clip summary; a missing clip is reported inside the envelope.
pub async fn audio_info(
    Extension(client): Extension<Arc<SunoClient>>,
    Path(clip_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let data = match client.audio_info(&clip_id).await? {
        Some(info) => json!(info),
        None => json!({ "error": "Clip not found" }),
    };
    Ok(Json(ApiResponse::success(data)))
}
