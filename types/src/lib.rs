use serde::{Deserialize, Serialize};

mod utils;

/// Body of `POST /api/chat`.
///
/// The first frontend posted `{ "content": ... }` and read the answer from
/// `reply`; requests in that shape are answered in that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatRequest {
    Message { message: String },
    Content { content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Response { response: String },
    Reply { reply: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,

    pub status: ImageStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A recipe as the chat provider is asked to write it.
///
/// `image` is left empty by the provider and filled in once an image has
/// been generated. Fields the provider adds beyond the requested ones are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,

    pub name: String,

    /// Kept as the provider wrote it, so `420` does not come back as
    /// `420.0`.
    pub calories: serde_json::Number,

    #[serde(default)]
    pub image: String,

    pub content: Vec<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
