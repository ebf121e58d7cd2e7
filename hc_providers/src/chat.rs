use async_trait::async_trait;
use openai_dive::v1::api::Client;
use openai_dive::v1::error::APIError;
use openai_dive::v1::resources::chat::{
    ChatCompletionParameters, ChatCompletionResponse, ChatMessage,
    ChatMessageContent,
};
use redact::Secret;

use crate::{ChatProvider, ProviderError};

const PROVIDER: &str = "OpenAI";

/// Chat completions through the `OpenAI` API.
pub struct OpenAiChat {
    client: Option<Client>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiChat {
    pub fn new(
        api_key: Option<&Secret<String>>,
        model: impl Into<String>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            client: api_key
                .map(|key| Client::new(key.expose_secret().to_string())),
            model: model.into(),
            temperature,
            max_tokens: None,
        }
    }

    /// Caps the length of each completion.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_parameters(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> ChatCompletionParameters {
        ChatCompletionParameters {
            model: self.model.clone(),
            temperature: self.temperature,
            max_completion_tokens: self.max_tokens,
            messages: vec![
                ChatMessage::System {
                    name: None,
                    content: ChatMessageContent::Text(
                        system_prompt.to_string(),
                    ),
                },
                ChatMessage::User {
                    name: None,
                    content: ChatMessageContent::Text(message.to_string()),
                },
            ],
            ..Default::default()
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn complete(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, ProviderError> {
        let client = self
            .client
            .as_ref()
            .ok_or(ProviderError::MissingCredentials { provider: PROVIDER })?;

        let response = client
            .chat()
            .create(self.build_parameters(system_prompt, message))
            .await
            .map_err(|e| {
                tracing::error!("failed to complete chat: {:?}", e);
                if let APIError::InvalidRequestError(message) = &e {
                    tracing::error!("invalid request: {:?}", message);
                }
                ProviderError::Api {
                    provider: PROVIDER,
                    message: e.to_string(),
                }
            })?;

        response_text(&response)
    }
}

fn response_text(
    response: &ChatCompletionResponse,
) -> Result<String, ProviderError> {
    let choice = response.choices.first().ok_or_else(|| {
        ProviderError::invalid_response(PROVIDER, "no choices returned")
    })?;

    match &choice.finish_reason {
        Some(reason) => {
            tracing::info!("finish reason: {:?}", reason);
        }
        None => {
            tracing::info!("no finish reason provided");
        }
    }

    match &choice.message {
        ChatMessage::Assistant {
            content: Some(ChatMessageContent::Text(text)),
            ..
        } => Ok(text.clone()),
        other => Err(ProviderError::invalid_response(
            PROVIDER,
            format!("no text content in {other:?}"),
        )),
    }
}
