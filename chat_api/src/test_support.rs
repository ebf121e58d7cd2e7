use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hc_providers::{ChatProvider, GeneratedImage, ImageGenerator, ProviderError};

use crate::config::Config;
use crate::state::AppState;

pub struct FakeChat {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeChat {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(system_prompt, message)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn complete(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), message.to_string()));

        self.reply.clone().map_err(|message| ProviderError::Api {
            provider: "fake",
            message,
        })
    }
}

type ImageOutcome =
    Box<dyn Fn() -> Result<GeneratedImage, ProviderError> + Send + Sync>;

pub struct FakeImages {
    outcome: ImageOutcome,
    synchronous: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn returning(
        outcome: impl Fn() -> Result<GeneratedImage, ProviderError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            outcome: Box::new(outcome),
            synchronous: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn url(url: &str) -> Self {
        let url = url.to_string();
        Self::returning(move || Ok(GeneratedImage::Url(url.clone())))
    }

    pub fn job_based(mut self) -> Self {
        self.synchronous = false;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(
        &self,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.outcome)()
    }

    fn is_synchronous(&self) -> bool {
        self.synchronous
    }
}

pub fn state(config: Config, chat: FakeChat, images: FakeImages) -> AppState {
    AppState::new(config, Arc::new(chat), Arc::new(images))
}
