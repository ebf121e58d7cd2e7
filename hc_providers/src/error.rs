use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} API key is not configured")]
    MissingCredentials { provider: &'static str },

    #[error("{provider} returned status {status}: {body}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("image generation failed: {0}")]
    GenerationFailed(String),

    #[error("failed to reach {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("image generation timed out: {0}")]
    Timeout(String),

    #[error("unexpected response from {provider}: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub(crate) fn transport(
        provider: &'static str,
    ) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { provider, source }
    }

    pub(crate) fn invalid_response(
        provider: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    /// Turns a non-2xx response into an `Upstream` error carrying its body.
    pub(crate) async fn from_status(
        provider: &'static str,
        response: reqwest::Response,
    ) -> Self {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable body: {e}>"),
        };

        Self::Upstream {
            provider,
            status,
            body,
        }
    }
}
