use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;

pub mod chat;
pub mod generate_image;
pub mod health;

/// Rejects blank text the same way a malformed body is rejected.
fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }

    Ok(())
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
