use std::sync::Arc;

use axum::{Extension, Json, extract::Path};

use crate::{
    api::ApiError,
    suno::SunoClient,
    types::{ApiResponse, GenerateSongRequest, GetFeedRequest},
};

pub async fn generate(
    Extension(client): Extension<Arc<SunoClient>>,
    Json(request): Json<GenerateSongRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let result = client.generate(&request).await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn feed(
    Extension(client): Extension<Arc<SunoClient>>,
    Json(request): Json<GetFeedRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let result = client.feed(&request.clip_ids).await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn single_feed(
    Extension(client): Extension<Arc<SunoClient>>,
    Path(clip_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let result = client.feed(&[clip_id]).await?;
    Ok(Json(ApiResponse::success(result)))
}
