use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reviews::ErrorBody;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Review text is empty")]
    EmptyReview,

    #[error("Review exceeds {max} characters")]
    ReviewTooLong { max: usize },

    #[error("Batch must contain between 1 and {max} reviews")]
    InvalidBatch { max: usize },

    #[error("Review {0} not found")]
    NotFound(u64),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Datastore error: {0}")]
    Storage(#[from] redis::RedisError),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::InternalError(Box::new(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::EmptyReview => StatusCode::BAD_REQUEST,
            AppError::ReviewTooLong { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidBatch { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Inference { .. } => StatusCode::BAD_GATEWAY,
            AppError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::EmptyReview.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ReviewTooLong { max: 10 }.into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::NotFound(7).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Inference("timeout".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::NotFound(3).to_string(), "Review 3 not found");
        assert_eq!(
            AppError::InvalidBatch { max: 50 }.to_string(),
            "Batch must contain between 1 and 50 reviews"
        );
    }
}
