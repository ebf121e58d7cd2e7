use types::Recipe;

/// The empty image field the recipe prompt asks the model to emit.
pub const IMAGE_PLACEHOLDER: &str = r#""image": """#;

/// Replaces the first `"image": ""` in `recipe_json` with the image
/// reference. The text is otherwise left as it is; without a placeholder it
/// comes back unchanged.
pub fn splice_image(recipe_json: &str, reference: &str) -> String {
    if !recipe_json.contains(IMAGE_PLACEHOLDER) {
        tracing::warn!("recipe has no image placeholder, returning it as is");
        return recipe_json.to_string();
    }

    let filled = format!(
        r#""image": {}"#,
        serde_json::Value::String(reference.to_string())
    );

    recipe_json.replacen(IMAGE_PLACEHOLDER, &filled, 1)
}

/// Decodes `recipe_json` as a [`Recipe`], sets its image and encodes it
/// again. A Markdown code fence around the JSON is tolerated.
///
/// # Errors
///
/// If the text is not a JSON object with the recipe fields.
pub fn attach_image(
    recipe_json: &str,
    reference: &str,
) -> Result<String, serde_json::Error> {
    let mut recipe: Recipe =
        serde_json::from_str(strip_code_fence(recipe_json))?;

    if recipe.has_image() {
        tracing::debug!(id = %recipe.id, "replacing image chosen by the model");
    }
    recipe.image = reference.to_string();

    serde_json::to_string(&recipe)
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();

    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // drop the info string (`json`) on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);

    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
