/**
 * Outbound clients for the generative AI providers used by healthy-chef.
 *
 * Every client is built once at startup and shared between requests; none
 * of them keep per-request state. A missing API key is only reported when a
 * call is attempted.
 */
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

mod chat;
mod dalle;
mod error;
mod gemini;
pub mod polling;
mod starryai;

pub use chat::OpenAiChat;
pub use dalle::{DalleClient, DalleOptions};
pub use error::ProviderError;
pub use gemini::GeminiImageClient;
pub use starryai::StarryAiClient;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends a system instruction and a single user message, returning the
    /// text of the first choice.
    async fn complete(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
    ) -> Result<GeneratedImage, ProviderError>;

    /// Job-based providers report `false`; their upstream status codes are
    /// not passed on to the caller.
    fn is_synchronous(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    Url(String),
    Inline { mime_type: String, bytes: Vec<u8> },
}

impl GeneratedImage {
    /// The URL of the image, or the inline bytes as a `data:` URI.
    pub fn reference(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline { mime_type, bytes } => {
                format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
            }
        }
    }
}
