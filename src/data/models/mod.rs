pub mod error_models;
pub mod quiz_models;
pub mod relay_models;
pub mod study_models;

pub use error_models::{
    AudioError, ConfigError, EnrichError, GeminiError, QuizError, RelayError, StudyError,
};
pub use quiz_models::{QuizQuestion, QuizState, QuizStatus};
pub use relay_models::{RelayPayload, RelayRequest, RelayResponse, Task};
pub use study_models::{
    AnswerForm, Feature, Mode, ModeForm, PendingWord, ProcessForm, SpeakParams, StudySession,
    VocabEntry, UNKNOWN_GLOSS,
};
