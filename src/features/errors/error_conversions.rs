use tokio::task::JoinError;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;

use crate::data::models::{RelayError, StudyError};

impl From<ValidationErrors> for RelayError {
    fn from(err: ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| err.to_string());
        RelayError::InvalidPayload(message)
    }
}

impl From<SessionError> for StudyError {
    fn from(err: SessionError) -> Self {
        StudyError::SessionError(err.to_string())
    }
}

impl From<JoinError> for StudyError {
    fn from(err: JoinError) -> Self {
        StudyError::TaskFailed(err.to_string())
    }
}

impl From<ValidationErrors> for StudyError {
    fn from(err: ValidationErrors) -> Self {
        StudyError::ValidationError(err.to_string())
    }
}
