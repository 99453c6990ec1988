use std::sync::Arc;

use axum::{Extension, Json};

use crate::{api::ApiError, suno::SunoClient, types::ApiResponse};

pub async fn session(
    Extension(client): Extension<Arc<SunoClient>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let result = client.session().await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn credits(
    Extension(client): Extension<Arc<SunoClient>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let result = client.billing_info().await?;
    Ok(Json(ApiResponse::success(result)))
}
