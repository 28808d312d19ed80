use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::data::models::QuizState;

/// Gloss used when a word could not be translated
pub const UNKNOWN_GLOSS: &str = "???";

/// A single vocabulary item shown in the study list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub id: String,                  // Source line index, `_synN` suffix for split synonyms
    pub line: usize,                 // Index of the input line this entry came from
    pub arabic: String,              // Arabic-script word or phrase
    pub english: String,             // English gloss, UNKNOWN_GLOSS when untranslated
    pub harakat: Option<String>,     // Fully vowelized form
    pub sentence: Option<String>,    // Example sentence (Arabic + English)
    pub pronunciation: Option<String>, // Phonetic transliteration
    pub loading_feature: Option<Feature>, // Feature currently being generated
}

impl VocabEntry {
    pub fn new(line: usize, arabic: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            id: line.to_string(),
            line,
            arabic: arabic.into(),
            english: english.into(),
            harakat: None,
            sentence: None,
            pronunciation: None,
            loading_feature: None,
        }
    }

    pub fn is_translated(&self) -> bool {
        !self.english.is_empty() && self.english != UNKNOWN_GLOSS
    }

    /// Harakat when it adds something over the bare word
    pub fn distinct_harakat(&self) -> Option<&str> {
        self.harakat
            .as_deref()
            .filter(|h| !h.is_empty() && *h != self.arabic)
    }
}

/// An input line without a gloss, waiting for translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWord {
    pub line: usize,
    pub arabic: String,
}

/// On-demand enrichment for a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Sentence,
    Pronunciation,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Sentence => "sentence",
            Feature::Pronunciation => "pronunciation",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Study,
    Quiz,
}

/// Everything the UI holds for one visitor between requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudySession {
    pub mode: Mode,
    pub input_text: String,
    pub items: Vec<VocabEntry>,
    pub status_message: String,
    pub is_processing: bool,
    pub is_speaking: bool,
    pub quiz: Option<QuizState>,
}

// Form structs
#[derive(Debug, Deserialize, Validate)]
pub struct ProcessForm {
    #[validate(length(max = 20000, message = "Word list is too long"))]
    pub input_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeForm {
    pub mode: Mode,
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub option: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeakParams {
    pub word: String,
}
