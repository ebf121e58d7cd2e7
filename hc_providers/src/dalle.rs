use async_trait::async_trait;
use redact::Secret;
use serde::Deserialize;
use serde_json::json;

use crate::{GeneratedImage, ImageGenerator, ProviderError};

const PROVIDER: &str = "DALL-E";

#[derive(Debug, Clone)]
pub struct DalleOptions {
    /// Root of the `OpenAI` REST API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub size: String,
    pub quality: String,
}

/// One-shot image generation through the `OpenAI` images endpoint.
#[derive(Debug, Clone)]
pub struct DalleClient {
    http_client: reqwest::Client,
    api_key: Option<Secret<String>>,
    options: DalleOptions,
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl DalleClient {
    pub const fn new(
        http_client: reqwest::Client,
        api_key: Option<Secret<String>>,
        options: DalleOptions,
    ) -> Self {
        Self {
            http_client,
            api_key,
            options,
        }
    }
}

#[async_trait]
impl ImageGenerator for DalleClient {
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
                "{}/images/generations",
                self.options.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key.expose_secret())
            .json(&json!({
                "model": self.options.model,
                "prompt": prompt,
                "n": 1,
                "size": self.options.size,
                "quality": self.options.quality,
            }))
            .send()
            .await
            .map_err(ProviderError::transport(PROVIDER))?;

        if !response.status().is_success() {
            let err = ProviderError::from_status(PROVIDER, response).await;
            tracing::error!("image generation rejected: {err}");
            return Err(err);
        }

        let body: ImagesResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::invalid_response(PROVIDER, e.to_string())
            })?;

        body.data
            .into_iter()
            .find_map(|image| image.url)
            .map(GeneratedImage::Url)
            .ok_or_else(|| {
                ProviderError::invalid_response(
                    PROVIDER,
                    "no image url returned",
                )
            })
    }
}
