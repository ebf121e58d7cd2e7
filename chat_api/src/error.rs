use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hc_providers::ProviderError;
use thiserror::Error;
use types::ErrorBody;

/// Every failure a handler can report. The HTTP status is decided here and
/// nowhere else.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    /// `status` is only set when the upstream status should be passed on.
    #[error("{detail}")]
    Provider {
        status: Option<StatusCode>,
        detail: String,
    },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Parse(String),
}

impl ApiError {
    /// Like `From<ProviderError>`, but a synchronous image provider's
    /// upstream status code is kept.
    pub fn from_image_error(e: ProviderError, synchronous: bool) -> Self {
        match e {
            ProviderError::Upstream { status, .. } if synchronous => {
                Self::Provider {
                    status: StatusCode::from_u16(status).ok(),
                    detail: e.to_string(),
                }
            }
            e => e.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Provider { status, .. } => {
                status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Parse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        let detail = e.to_string();
        match e {
            ProviderError::Transport { .. } => Self::Transport(detail),
            ProviderError::Timeout(_) => Self::Timeout(detail),
            _ => Self::Provider {
                status: None,
                detail,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
            tracing::error!("request failed with {status}: {self}");
        } else {
            tracing::warn!("request rejected with {status}: {self}");
        }

        (status, Json(ErrorBody::from(self.to_string()))).into_response()
    }
}
