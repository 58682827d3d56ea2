use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Every failure the API reports to a client.
///
/// The detail carried by each variant is only logged; clients see the status
/// code and a fixed message.
#[derive(ThisError, Debug)]
pub enum ApiError {
    /// Malformed or incomplete request input
    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    /// Missing entity or empty result page
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Well-formed request the store refused to act on
    #[error("Unprocessable: {reason}")]
    Unprocessable { reason: String },

    /// Unexpected store or server failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        ApiError::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        ApiError::Unprocessable {
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "Bad Request",
            ApiError::NotFound { .. } => "Resource(s) Not Found",
            ApiError::Unprocessable { .. } => "Not Processable",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(error))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// an id that does not parse cannot name any resource
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::not_found(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(_) => tracing::error!("Internal service error: {:#}", self),
            ApiError::Unprocessable { .. } => tracing::warn!("Unprocessable request: {}", self),
            ApiError::BadRequest { .. } | ApiError::NotFound { .. } => {
                tracing::debug!("Client error: {}", self)
            }
        }

        let status = self.status_code();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_maps_to_its_status() {
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::unprocessable("x").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_detail_is_not_exposed() {
        let error = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(error.user_message(), "Internal Server Error");
    }
}
