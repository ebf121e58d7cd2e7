use hc_providers::{ChatProvider, ImageGenerator};

use crate::config::RecipeMerge;
use crate::error::ApiError;
use crate::{prompts, recipe};

/// Asks for a recipe, generates a picture of the request and puts the
/// picture into the recipe. The two provider calls run one after the other;
/// either failing fails the whole request.
pub async fn compose_recipe(
    chat: &dyn ChatProvider,
    images: &dyn ImageGenerator,
    message: &str,
    merge: RecipeMerge,
) -> Result<String, ApiError> {
    let recipe_json = chat.complete(prompts::RECIPE, message).await?;

    let image = images.generate(message).await?;
    let reference = image.reference();

    match merge {
        RecipeMerge::Structured => {
            recipe::attach_image(&recipe_json, &reference).map_err(|e| {
                ApiError::Parse(format!("chat output is not a recipe: {e}"))
            })
        }
        RecipeMerge::Splice => {
            Ok(recipe::splice_image(&recipe_json, &reference))
        }
    }
}
