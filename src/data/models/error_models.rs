use thiserror::Error;

// Upstream generative-AI errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Gemini response contained no text")]
    EmptyResponse,
    #[error("TTS response missing inlineData")]
    MissingAudio,
}

// Relay errors, surfaced to callers as JSON
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("API key is not configured on the server.")]
    MissingApiKey,
    #[error("Missing 'task' or 'payload' in request body.")]
    MissingFields,
    #[error("Unknown task: {0}")]
    UnknownTask(String),
    #[error("{0}")]
    InvalidPayload(String),
    #[error("Failed to process request on the server.")]
    Upstream(#[from] GeminiError),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Invalid audio response structure or MIME type: {0}")]
    UnsupportedMime(String),
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Audio does not fit a WAV container: {0}")]
    OutOfRange(&'static str),
}

// Errors from the enrichment calls made on behalf of the study UI
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error("Translation response was not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Unexpected relay response for task {0}")]
    UnexpectedResponse(&'static str),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("You need at least 4 words to start a quiz (you have {have}).")]
    NotEnoughWords { have: usize },
}

// Study UI errors
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("No study item at index {0}")]
    ItemNotFound(usize),
    #[error("Another request is already in progress")]
    Busy,
    #[error("Error generating audio via secure API. Please try again.")]
    AudioFailed(#[source] EnrichError),
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
