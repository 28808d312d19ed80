use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::{RelayError, StudyError};

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingFields
            | RelayError::UnknownTask(_)
            | RelayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::MissingApiKey | RelayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for StudyError {
    fn into_response(self) -> Response {
        let status = match &self {
            StudyError::ValidationError(_) => StatusCode::BAD_REQUEST,
            StudyError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            StudyError::Busy => StatusCode::CONFLICT,
            StudyError::AudioFailed(_) => StatusCode::BAD_GATEWAY,
            StudyError::SessionError(e) => {
                log::error!("Session error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            StudyError::TaskFailed(e) => {
                log::error!("Background task failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
