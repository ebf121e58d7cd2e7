use std::time::Duration;

use hc_providers::polling::PollPolicy;
use redact::Secret;
use serde::Deserialize;

/// What `/api/chat` does with a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// Nutrition assistant, free text answer.
    #[default]
    Plain,
    /// Recipe JSON without an image.
    Recipe,
    /// Recipe JSON with a generated image attached.
    RecipeWithImage,
}

/// How a generated image reference is put into the recipe text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeMerge {
    #[default]
    Structured,
    Splice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageProviderKind {
    #[default]
    Dalle,
    Starryai,
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,

    pub openai_api_key: Option<Secret<String>>,
    pub starryai_api_key: Option<Secret<String>>,
    pub gemini_api_key: Option<Secret<String>>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: Option<f32>,
    pub chat_max_tokens: Option<u32>,
    #[serde(default)]
    pub chat_mode: ChatMode,
    #[serde(default)]
    pub recipe_merge: RecipeMerge,

    #[serde(default)]
    pub image_provider: ImageProviderKind,
    #[serde(default = "default_dalle_base_url")]
    pub dalle_base_url: String,
    #[serde(default = "default_dalle_model")]
    pub dalle_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_image_quality")]
    pub image_quality: String,
    #[serde(default = "default_starryai_base_url")]
    pub starryai_base_url: String,
    #[serde(default = "default_starryai_model")]
    pub starryai_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_gemini_image_model")]
    pub gemini_image_model: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,
    pub poll_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_cors_allowed_origins() -> String {
    "*".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_chat_temperature() -> Option<f32> {
    Some(0.7)
}

fn default_dalle_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_dalle_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_quality() -> String {
    "standard".to_string()
}

fn default_starryai_base_url() -> String {
    "https://api.starryai.com".to_string()
}

fn default_starryai_model() -> String {
    "lyra".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_image_model() -> String {
    "gemini-2.0-flash-preview-image-generation".to_string()
}

const fn default_poll_interval_secs() -> u64 {
    2
}

const fn default_poll_max_attempts() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: default_cors_allowed_origins(),
            openai_api_key: None,
            starryai_api_key: None,
            gemini_api_key: None,
            openai_model: default_openai_model(),
            chat_temperature: default_chat_temperature(),
            chat_max_tokens: None,
            chat_mode: ChatMode::default(),
            recipe_merge: RecipeMerge::default(),
            image_provider: ImageProviderKind::default(),
            dalle_base_url: default_dalle_base_url(),
            dalle_model: default_dalle_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
            starryai_base_url: default_starryai_base_url(),
            starryai_model: default_starryai_model(),
            gemini_base_url: default_gemini_base_url(),
            gemini_image_model: default_gemini_image_model(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_attempts: self.poll_max_attempts,
            timeout: self.poll_timeout_secs.map(Duration::from_secs),
        }
    }
}
