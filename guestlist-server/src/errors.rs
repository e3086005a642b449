use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use guestlist_ledger::SeatingError;
use log::error;
use thiserror::Error;

use crate::serialized::ErrorMessage;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
    /// The table is full or the guest already exists
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let Self::Unknown(message) = &self {
            error!("Request failed: {message}");
        }

        let body = ErrorMessage {
            error: self.to_string(),
        };

        (self.as_status_code(), Json(body)).into_response()
    }
}

impl From<SeatingError> for ServerError {
    fn from(value: SeatingError) -> Self {
        match value {
            SeatingError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            SeatingError::Validation(message) => Self::BadRequest(message),
            e @ (SeatingError::InsufficientCapacity { .. } | SeatingError::Conflict { .. }) => {
                Self::Conflict(e.to_string())
            }
            SeatingError::Storage(e) => Self::Unknown(e.to_string()),
        }
    }
}
