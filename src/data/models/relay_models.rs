use serde::{Deserialize, Serialize};
use validator::Validate;

/// The fixed set of jobs the relay forwards upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Tts,
    Harakat,
    Translation,
    Sentence,
    Pronunciation,
}

impl Task {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "tts" => Some(Task::Tts),
            "harakat" => Some(Task::Harakat),
            "translation" => Some(Task::Translation),
            "sentence" => Some(Task::Sentence),
            "pronunciation" => Some(Task::Pronunciation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Task::Tts => "tts",
            Task::Harakat => "harakat",
            Task::Translation => "translation",
            Task::Sentence => "sentence",
            Task::Pronunciation => "pronunciation",
        }
    }
}

/// Request body for `POST /api/gemini`
#[derive(Debug, Default, Deserialize)]
pub struct RelayRequest {
    pub task: Option<String>,
    pub payload: Option<RelayPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing 'prompt' in payload."))]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl RelayPayload {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Relay reply: generated text, or base64 audio with its MIME type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Text {
        result: String,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        audio_data: String,
        mime_type: String,
    },
}
