use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;
use types::{ImageRequest, ImageResponse};

use super::require_text;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state, body))]
pub async fn handler(
    State(state): State<AppState>,
    body: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(request) = body?;
    require_text("prompt", &request.prompt)?;

    tracing::info!("generate_image");

    let image = state.images.generate(&request.prompt).await.map_err(|e| {
        ApiError::from_image_error(e, state.images.is_synchronous())
    })?;

    Ok(Json(ImageResponse::success(image.reference())))
}
