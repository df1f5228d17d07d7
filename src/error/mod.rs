//! Route finder error types.
use alloy::primitives::ChainId;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

mod cache;
pub use cache::CacheError;

mod estimation;
pub use estimation::{ChainUnavailable, EstimationError};

mod sourcing;
pub use sourcing::SourcingError;

mod validation;
pub use validation::ValidationError;

/// The overarching error type returned by the HTTP API.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The request is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Errors related to sourcing plans.
    #[error(transparent)]
    Sourcing(#[from] SourcingError),
    /// Errors related to fee estimation.
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    /// The chain is not supported.
    #[error("unsupported chain {0}")]
    UnsupportedChain(ChainId),
    /// An internal error occurred.
    #[error(transparent)]
    Internal(#[from] eyre::Error),
}

impl RouterError {
    /// The HTTP status of this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnsupportedChain(_) => StatusCode::BAD_REQUEST,
            Self::Sourcing(err) => err.status_code(),
            Self::Estimation(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Always `"failure"`.
    pub status: &'static str,
    /// Human readable message.
    pub message: String,
    /// Individual validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorBody {
    /// A failure with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: "failure", message: message.into(), errors: None }
    }
}

impl From<&RouterError> for ErrorBody {
    fn from(err: &RouterError) -> Self {
        match err {
            RouterError::Validation(inner) if !inner.errors.is_empty() => {
                Self { errors: Some(inner.errors.clone()), ..Self::new(inner.to_string()) }
            }
            // internal details are logged, not returned
            RouterError::Internal(_) => Self::new("internal error"),
            _ => Self::new(err.to_string()),
        }
    }
}

impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(err = ?self, "Request failed");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
