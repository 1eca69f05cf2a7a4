use axum::{extract::State, Json};
use tracing::info;

use crate::history::HistoryEntry;
use crate::models::chat::{GenerateImageRequest, GenerateImageResponse};
use crate::state::AppState;
use crate::utils::error::ApiError;

pub async fn generate_image_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, ApiError> {
    let prompt = request.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".to_string()));
    }

    let image_url = state.image_service.generate_url(&prompt)?;
    info!("Image URL generated for prompt ({} chars)", prompt.len());

    state
        .history
        .append(HistoryEntry::image(prompt, image_url.clone()))
        .await;

    Ok(Json(GenerateImageResponse { image_url }))
}
