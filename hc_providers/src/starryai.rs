use async_trait::async_trait;
use redact::Secret;
use serde::Deserialize;
use serde_json::json;

use crate::polling::{JobStatus, PollPolicy, RemoteJob, run_to_completion};
use crate::{GeneratedImage, ImageGenerator, ProviderError};

const PROVIDER: &str = "StarryAI";

/// StarryAI creations API: a creation is submitted, then polled until it
/// completes.
#[derive(Debug, Clone)]
pub struct StarryAiClient {
    http_client: reqwest::Client,
    api_key: Option<Secret<String>>,
    base_url: String,
    model: String,
    policy: PollPolicy,
}

#[derive(Deserialize)]
struct CreationCreated {
    id: serde_json::Value,
}

#[derive(Deserialize)]
struct Creation {
    status: String,
    #[serde(default)]
    images: Vec<CreationImage>,
}

#[derive(Deserialize)]
struct CreationImage {
    url: Option<String>,
}

impl StarryAiClient {
    pub fn new(
        http_client: reqwest::Client,
        api_key: Option<Secret<String>>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
            policy,
        }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .ok_or(ProviderError::MissingCredentials { provider: PROVIDER })
    }

    fn creations_url(&self) -> String {
        format!("{}/creations/", self.base_url.trim_end_matches('/'))
    }
}

fn classify(creation: Creation) -> JobStatus {
    match creation.status.to_ascii_lowercase().as_str() {
        "completed" | "succeeded" => JobStatus::Succeeded(
            creation.images.into_iter().find_map(|image| image.url),
        ),
        "failed" | "expired" | "canceled" | "cancelled" => {
            JobStatus::Failed(format!("creation {}", creation.status))
        }
        _ => JobStatus::InProgress,
    }
}

#[async_trait]
impl RemoteJob for StarryAiClient {
    async fn submit(&self, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .post(self.creations_url())
            .header("X-API-Key", self.api_key()?)
            .json(&json!({
                "prompt": prompt,
                "model": self.model,
                "aspectRatio": "square",
                "highResolution": false,
                "images": 1,
                "steps": 20,
                "initialImageMode": "color",
            }))
            .send()
            .await
            .map_err(ProviderError::transport(PROVIDER))?;

        if !response.status().is_success() {
            let err = ProviderError::from_status(PROVIDER, response).await;
            tracing::error!("failed to create image job: {err}");
            return Err(err);
        }

        let created: CreationCreated = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::invalid_response(PROVIDER, e.to_string())
            })?;

        match created.id {
            serde_json::Value::String(id) => Ok(id),
            serde_json::Value::Number(id) => Ok(id.to_string()),
            other => Err(ProviderError::invalid_response(
                PROVIDER,
                format!("unexpected creation id {other}"),
            )),
        }
    }

    async fn status(&self, job_id: &str) -> JobStatus {
        let api_key = match self.api_key() {
            Ok(key) => key,
            Err(e) => return JobStatus::Failed(e.to_string()),
        };

        let response = match self
            .http_client
            .get(format!("{}{job_id}", self.creations_url()))
            .header("X-API-Key", api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return JobStatus::TransientError(e.to_string()),
        };

        if !response.status().is_success() {
            return JobStatus::TransientError(format!(
                "status check returned {}",
                response.status()
            ));
        }

        match response.json::<Creation>().await {
            Ok(creation) => classify(creation),
            Err(e) => JobStatus::TransientError(e.to_string()),
        }
    }
}

#[async_trait]
impl ImageGenerator for StarryAiClient {
    async fn generate(
        &self,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError> {
        run_to_completion(self, prompt, self.policy)
            .await
            .map(GeneratedImage::Url)
    }

    fn is_synchronous(&self) -> bool {
        false
    }
}
