use axum::Json;
use tracing::instrument;
use types::HealthResponse;

#[instrument]
pub async fn handler() -> Json<HealthResponse> {
    tracing::info!("health");

    Json(HealthResponse::healthy())
}
