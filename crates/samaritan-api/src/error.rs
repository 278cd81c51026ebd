use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use samaritan_core::EngineError;
use samaritan_db::StoreError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("Content-Type must be application/json")]
    NotAcceptable,

    #[error("Invalid request parameters: unknown field {0:?}")]
    UnknownField(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::UnknownField(_) => StatusCode::BAD_REQUEST,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::Engine(e) => match e {
                EngineError::Validation(_) => StatusCode::BAD_REQUEST,
                EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
                // The stored record has the wrong shape for the request.
                EngineError::Store(
                    StoreError::InvalidUpdate { .. }
                    | StoreError::Corrupt { .. }
                    | StoreError::Encode(_),
                )
                | EngineError::Mapping { .. }
                | EngineError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
                EngineError::Store(_) | EngineError::PartiallyApplied { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            if status.is_server_error() {
                error!("Request failed: {}", self);
            } else {
                warn!("Request rejected: {}", self);
            }
            self.to_string()
        };
        (status, body).into_response()
    }
}
