use crate::{
    ChatRequest, ChatResponse, ErrorBody, HealthResponse, ImageResponse,
    ImageStatus, Recipe,
};

impl ChatRequest {
    pub fn text(&self) -> &str {
        match self {
            Self::Message { message } => message,
            Self::Content { content } => content,
        }
    }

    /// Wraps `text` in the response shape matching this request.
    pub fn answer(&self, text: String) -> ChatResponse {
        match self {
            Self::Message { .. } => ChatResponse::Response { response: text },
            Self::Content { .. } => ChatResponse::Reply { reply: text },
        }
    }
}

impl ImageResponse {
    pub fn success(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            status: ImageStatus::Success,
        }
    }
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

impl From<String> for ErrorBody {
    fn from(detail: String) -> Self {
        Self { detail }
    }
}

impl Recipe {
    /// Whether the provider left the image slot empty.
    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }
}
