use std::sync::Arc;

use hc_app::BootstrapError;
use hc_providers::{
    ChatProvider, DalleClient, DalleOptions, GeminiImageClient, ImageGenerator,
    OpenAiChat, StarryAiClient,
};

use crate::config::{Config, ImageProviderKind};

/// Shared by every request. The provider clients are built once here and
/// reused for the life of the process.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub chat: Arc<dyn ChatProvider>,
    pub images: Arc<dyn ImageGenerator>,
}

impl AppState {
    pub fn new(
        config: Config,
        chat: Arc<dyn ChatProvider>,
        images: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat,
            images,
        }
    }
}

impl hc_app::ContextProvider<Config> for AppState {
    async fn new(config: Config) -> Result<Self, BootstrapError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("healthy-chef/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BootstrapError::Context(format!(
                    "failed to create http client: {e}"
                ))
            })?;

        for (name, key) in [
            ("OPENAI_API_KEY", &config.openai_api_key),
            ("STARRYAI_API_KEY", &config.starryai_api_key),
            ("GEMINI_API_KEY", &config.gemini_api_key),
        ] {
            if key.is_none() {
                tracing::warn!(
                    "{name} is not set; calls that need it will fail"
                );
            }
        }

        let chat = Arc::new(OpenAiChat::new(
            config.openai_api_key.as_ref(),
            config.openai_model.clone(),
            config.chat_temperature,
        )
        .with_max_tokens(config.chat_max_tokens));

        let images: Arc<dyn ImageGenerator> = match config.image_provider {
            ImageProviderKind::Dalle => Arc::new(DalleClient::new(
                http_client,
                config.openai_api_key.clone(),
                DalleOptions {
                    base_url: config.dalle_base_url.clone(),
                    model: config.dalle_model.clone(),
                    size: config.image_size.clone(),
                    quality: config.image_quality.clone(),
                },
            )),
            ImageProviderKind::Starryai => Arc::new(StarryAiClient::new(
                http_client,
                config.starryai_api_key.clone(),
                config.starryai_base_url.clone(),
                config.starryai_model.clone(),
                config.poll_policy(),
            )),
            ImageProviderKind::Gemini => Arc::new(GeminiImageClient::new(
                http_client,
                config.gemini_api_key.clone(),
                config.gemini_base_url.clone(),
                config.gemini_image_model.clone(),
            )),
        };

        tracing::info!(
            chat_mode = ?config.chat_mode,
            image_provider = ?config.image_provider,
            "providers configured"
        );

        Ok(Self::new(config, chat, images))
    }
}
