use futures_util::future::join;
use rand::Rng;

use crate::data::models::{
    EnrichError, Feature, Mode, QuizStatus, StudyError, StudySession, VocabEntry,
};
use crate::features::gemini::GenerativeModel;
use crate::features::{enrich, parser, quiz};

/// Outcome of running a word list through parsing and enrichment
#[derive(Debug)]
pub struct ProcessOutcome {
    pub items: Vec<VocabEntry>,
    pub status_message: String,
}

/// Parses the raw list, translates glossless words, adds harakat and splits synonyms
pub async fn process_input<M: GenerativeModel>(model: &M, input: &str) -> ProcessOutcome {
    let parsed = parser::parse_input(input);

    let (merged, status_message) = if parsed.pending.is_empty() {
        let complete = enrich::add_harakat(model, parsed.complete).await;
        (complete, "Formatting complete.".to_string())
    } else {
        log::info!(
            "Translating {} Najdi words and generating Harakat",
            parsed.pending.len()
        );
        let (mut complete, translated) = join(
            enrich::add_harakat(model, parsed.complete),
            enrich::translate_words(model, &parsed.pending),
        )
        .await;

        match translated {
            Ok(entries) => {
                complete.extend(entries);
                (complete, "Translation and initial formatting complete.".to_string())
            }
            Err(e) => {
                log::error!("Gemini translation/harakat error: {}", e);
                complete.extend(enrich::untranslated(&parsed.pending));
                (
                    complete,
                    "Error fetching translations. Showing formatted list only. Some translations might be missing."
                        .to_string(),
                )
            }
        }
    };

    ProcessOutcome {
        items: parser::finalize(parser::split_synonyms(merged)),
        status_message,
    }
}

impl StudySession {
    /// Marks the session busy; false when the input is blank or a run is in flight
    pub fn begin_processing(&mut self, input: &str) -> bool {
        if input.trim().is_empty() || self.is_processing {
            return false;
        }

        self.input_text = input.to_string();
        self.is_processing = true;
        self.status_message = "Analyzing list...".to_string();
        true
    }

    pub fn finish_processing(&mut self, outcome: ProcessOutcome) {
        self.items = outcome.items;
        self.status_message = outcome.status_message;
        self.is_processing = false;
    }

    pub fn clear(&mut self) {
        *self = StudySession {
            status_message: "Input cleared. Ready for a new list.".to_string(),
            ..StudySession::default()
        };
    }

    pub fn export_text(&self) -> String {
        parser::export_text(&self.items)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Marks `feature` as loading on the item at `index` and returns its id
    ///
    /// Returns `Ok(None)` when the item is busy with a different feature.
    pub fn begin_feature(
        &mut self,
        index: usize,
        feature: Feature,
    ) -> Result<Option<(String, String)>, StudyError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(StudyError::ItemNotFound(index))?;

        if item.loading_feature.is_some_and(|f| f != feature) {
            return Ok(None);
        }

        item.loading_feature = Some(feature);
        Ok(Some((item.id.clone(), item.arabic.clone())))
    }

    /// Stores a generated feature; a no-op if the item disappeared meanwhile
    pub fn finish_feature(&mut self, id: &str, feature: Feature, result: String) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return;
        };

        match feature {
            Feature::Sentence => item.sentence = Some(result),
            Feature::Pronunciation => item.pronunciation = Some(result),
        }
        item.loading_feature = None;
    }

    pub fn begin_speaking(&mut self) -> Result<(), StudyError> {
        if self.is_speaking {
            return Err(StudyError::Busy);
        }

        self.is_speaking = true;
        self.status_message = "Generating audio...".to_string();
        Ok(())
    }

    pub fn finish_speaking(&mut self, word: &str, result: &Result<Vec<u8>, EnrichError>) {
        self.is_speaking = false;
        self.status_message = match result {
            Ok(_) => format!("Playing audio for \"{}\"...", word),
            Err(_) => "Error generating audio via secure API. Please try again.".to_string(),
        };
    }

    pub fn start_quiz<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match quiz::build_quiz(&self.items, rng) {
            Ok(state) => {
                self.status_message =
                    format!("Quiz started! {} questions remaining.", state.questions.len());
                self.quiz = Some(state);
                self.mode = Mode::Quiz;
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn answer(&mut self, option: &str) -> Option<bool> {
        self.quiz.as_mut()?.answer(option)
    }

    pub fn next_question(&mut self) {
        let Some(state) = self.quiz.as_mut() else {
            return;
        };

        let before = state.status;
        if state.next() == QuizStatus::Finished && before != QuizStatus::Finished {
            self.status_message = format!(
                "Quiz finished! Final score: {}/{}",
                state.score,
                state.questions.len()
            );
        }
    }
}
