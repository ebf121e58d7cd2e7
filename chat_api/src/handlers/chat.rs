use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;
use types::{ChatRequest, ChatResponse};

use super::require_text;
use crate::composer::compose_recipe;
use crate::config::ChatMode;
use crate::error::ApiError;
use crate::prompts;
use crate::state::AppState;

#[instrument(skip(state, body))]
pub async fn handler(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = body?;
    require_text("message", request.text())?;

    let mode = state.config.chat_mode;
    tracing::info!(?mode, "chat");

    let response = match mode {
        ChatMode::Plain => {
            state
                .chat
                .complete(prompts::NUTRITION_ASSISTANT, request.text())
                .await?
        }
        ChatMode::Recipe => {
            state.chat.complete(prompts::RECIPE, request.text()).await?
        }
        ChatMode::RecipeWithImage => {
            compose_recipe(
                state.chat.as_ref(),
                state.images.as_ref(),
                request.text(),
                state.config.recipe_merge,
            )
            .await?
        }
    };

    Ok(Json(request.answer(response)))
}
