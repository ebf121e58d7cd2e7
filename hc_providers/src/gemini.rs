use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use redact::Secret;
use serde::Deserialize;
use serde_json::json;

use crate::{GeneratedImage, ImageGenerator, ProviderError};

const PROVIDER: &str = "Gemini";

/// Gemini image generation. The image arrives inline in the response and is
/// handed back as bytes, not as a hosted URL.
#[derive(Debug, Clone)]
pub struct GeminiImageClient {
    http_client: reqwest::Client,
    api_key: Option<Secret<String>>,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GeminiImageClient {
    pub fn new(
        http_client: reqwest::Client,
        api_key: Option<Secret<String>>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate(
        &self,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ProviderError::MissingCredentials { provider: PROVIDER })?;

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url.trim_end_matches('/'),
                self.model
            ))
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
            }))
            .send()
            .await
            .map_err(ProviderError::transport(PROVIDER))?;

        if !response.status().is_success() {
            let err = ProviderError::from_status(PROVIDER, response).await;
            tracing::error!("image generation rejected: {err}");
            return Err(err);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::invalid_response(PROVIDER, e.to_string())
            })?;

        let inline = body
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.inline_data)
            .ok_or_else(|| {
                ProviderError::invalid_response(
                    PROVIDER,
                    "no image in response",
                )
            })?;

        let bytes = STANDARD.decode(inline.data.as_bytes()).map_err(|e| {
            ProviderError::invalid_response(
                PROVIDER,
                format!("image data is not base64: {e}"),
            )
        })?;

        tracing::info!(
            mime_type = %inline.mime_type,
            size = bytes.len(),
            "received inline image"
        );

        Ok(GeneratedImage::Inline {
            mime_type: inline.mime_type,
            bytes,
        })
    }
}
