use rand::{seq::SliceRandom, Rng};

use crate::data::models::{QuizError, QuizQuestion, QuizState, QuizStatus, VocabEntry};

/// Minimum number of glossed words needed for four distinct options
pub const MIN_QUIZ_WORDS: usize = 4;
const DISTRACTORS: usize = 3;

/// Builds a shuffled multiple-choice quiz over the translated entries
pub fn build_quiz<R: Rng + ?Sized>(
    items: &[VocabEntry],
    rng: &mut R,
) -> Result<QuizState, QuizError> {
    let mut valid: Vec<&VocabEntry> = items.iter().filter(|w| w.is_translated()).collect();
    if valid.len() < MIN_QUIZ_WORDS {
        return Err(QuizError::NotEnoughWords { have: valid.len() });
    }

    valid.shuffle(rng);

    let questions = valid
        .iter()
        .enumerate()
        .map(|(id, word)| {
            let correct_answer = word.english.clone();

            let mut incorrect: Vec<&str> = Vec::new();
            for candidate in &valid {
                let gloss = candidate.english.as_str();
                if gloss != correct_answer && !incorrect.contains(&gloss) {
                    incorrect.push(gloss);
                }
            }
            incorrect.shuffle(rng);

            let mut options: Vec<String> = std::iter::once(correct_answer.clone())
                .chain(incorrect.into_iter().take(DISTRACTORS).map(str::to_string))
                .collect();
            options.shuffle(rng);

            QuizQuestion {
                id,
                arabic: word.arabic.clone(),
                harakat: word
                    .harakat
                    .clone()
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| word.arabic.clone()),
                correct_answer,
                options,
                selected_answer: None,
                is_correct: None,
            }
        })
        .collect();

    Ok(QuizState {
        questions,
        current_index: 0,
        score: 0,
        status: QuizStatus::InProgress,
    })
}

impl QuizState {
    pub fn current(&self) -> Option<&QuizQuestion> {
        match self.status {
            QuizStatus::Idle => None,
            _ => self.questions.get(self.current_index),
        }
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Records an answer for the current question; `None` when it is not accepted
    pub fn answer(&mut self, option: &str) -> Option<bool> {
        if self.status != QuizStatus::InProgress {
            return None;
        }

        let question = self.questions.get_mut(self.current_index)?;
        if question.is_answered() {
            return None;
        }

        let is_correct = option == question.correct_answer;
        question.selected_answer = Some(option.to_string());
        question.is_correct = Some(is_correct);

        if is_correct {
            self.score += 1;
        }
        Some(is_correct)
    }

    /// Moves past an answered question, finishing after the last one
    pub fn next(&mut self) -> QuizStatus {
        let answered = self.current().is_some_and(QuizQuestion::is_answered);
        if self.status != QuizStatus::InProgress || !answered {
            return self.status;
        }

        if self.is_last() {
            self.status = QuizStatus::Finished;
        } else {
            self.current_index += 1;
        }
        self.status
    }
}
