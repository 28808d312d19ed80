use futures_util::future::join_all;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::data::models::{
    EnrichError, Feature, PendingWord, RelayPayload, RelayResponse, Task, VocabEntry,
    UNKNOWN_GLOSS,
};
use crate::features::{audio, gemini::GenerativeModel, relay};

lazy_static! {
    static ref QUOTES_RE: Regex = Regex::new(r#"['"`]+"#).unwrap();
    static ref FENCE_RE: Regex = Regex::new(r"```(?:json)?").unwrap();
}

const HARAKAT_INSTRUCTION: &str = "You are an expert Arabic linguist. Your task is to provide the fully vowelized (with Harakat/diacritics) version of a given Najdi Arabic word or phrase. Output ONLY the vowelized word/phrase.";
const SENTENCE_INSTRUCTION: &str = "You are a language tutor specializing in Najdi Arabic. Provide a single, short, and common example sentence.";
const PRONUNCIATION_INSTRUCTION: &str = "You are a linguistic expert focusing on Arabic phonetics. Provide the simplest, human-readable English phonetic guide (transliteration).";

#[derive(Debug, Deserialize)]
struct TranslationPair {
    #[serde(default)]
    arabic: String,
    #[serde(default)]
    english: String,
}

async fn request_text<M: GenerativeModel>(
    model: &M,
    task: Task,
    payload: RelayPayload,
) -> Result<String, EnrichError> {
    match relay::dispatch(model, task, &payload).await? {
        RelayResponse::Text { result } => Ok(result),
        RelayResponse::Audio { .. } => Err(EnrichError::UnexpectedResponse(task.as_str())),
    }
}

fn translation_prompt(words: &[PendingWord]) -> String {
    let list = words
        .iter()
        .map(|w| w.arabic.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an expert in Najdi Arabic dialect.\n\
         I have a list of Arabic words/phrases: [{list}].\n\n\
         For each word, provide the closest English meaning.\n\
         Return strictly a JSON array of objects with keys \"arabic\" and \"english\".\n\
         Do not include markdown formatting (like ```json). Just the raw JSON.\n\n\
         Example output format:\n\
         [\n  {{\"arabic\": \"word1\", \"english\": \"meaning1\"}},\n  {{\"arabic\": \"word2\", \"english\": \"meaning2\"}}\n]"
    )
}

/// Vowelized form of a word; the word itself when the call fails
pub async fn generate_harakat<M: GenerativeModel>(model: &M, word: &str) -> String {
    let payload = RelayPayload::new(format!(
        "Provide the fully vowelized version of the Najdi Arabic word: \"{word}\"."
    ))
    .with_system_instruction(HARAKAT_INSTRUCTION);

    match request_text(model, Task::Harakat, payload).await {
        Ok(result) => {
            let cleaned = QUOTES_RE.replace_all(result.trim(), "").trim().to_string();
            if cleaned.is_empty() {
                word.to_string()
            } else {
                cleaned
            }
        }
        Err(e) => {
            log::warn!("Harakat generation failed for {:?}: {}", word, e);
            word.to_string()
        }
    }
}

/// Adds harakat to every entry concurrently
pub async fn add_harakat<M: GenerativeModel>(model: &M, entries: Vec<VocabEntry>) -> Vec<VocabEntry> {
    join_all(entries.into_iter().map(|mut entry| async move {
        entry.harakat = Some(generate_harakat(model, &entry.arabic).await);
        entry
    }))
    .await
}

fn parse_translations(raw: &str) -> Result<Vec<TranslationPair>, EnrichError> {
    let cleaned = FENCE_RE.replace_all(raw, "");
    Ok(serde_json::from_str(cleaned.trim())?)
}

fn match_translation<'a>(
    word: &PendingWord,
    index: usize,
    pairs: &'a [TranslationPair],
) -> Option<&'a TranslationPair> {
    pairs
        .iter()
        .find(|p| {
            !p.arabic.is_empty() && (p.arabic.contains(&word.arabic) || word.arabic.contains(&p.arabic))
        })
        .or_else(|| pairs.get(index))
}

/// Translates glossless words in one call, then vowelizes the ones that got a gloss
pub async fn translate_words<M: GenerativeModel>(
    model: &M,
    words: &[PendingWord],
) -> Result<Vec<VocabEntry>, EnrichError> {
    let raw = request_text(model, Task::Translation, RelayPayload::new(translation_prompt(words)))
        .await?;
    let pairs = parse_translations(&raw)?;

    let entries = words.iter().enumerate().map(|(index, word)| {
        let english = match_translation(word, index, &pairs)
            .map(|p| p.english.trim())
            .filter(|e| !e.is_empty())
            .unwrap_or(UNKNOWN_GLOSS)
            .to_string();

        async move {
            let mut entry = VocabEntry::new(word.line, word.arabic.clone(), english);
            entry.harakat = Some(if entry.is_translated() {
                generate_harakat(model, &entry.arabic).await
            } else {
                entry.arabic.clone()
            });
            entry
        }
    });

    Ok(join_all(entries).await)
}

/// Entries for words whose translation could not be fetched
pub fn untranslated(words: &[PendingWord]) -> Vec<VocabEntry> {
    words
        .iter()
        .map(|w| {
            let mut entry = VocabEntry::new(w.line, w.arabic.clone(), UNKNOWN_GLOSS);
            entry.harakat = Some(w.arabic.clone());
            entry
        })
        .collect()
}

/// Example sentence or phonetic guide; an error marker when the call fails
pub async fn generate_context<M: GenerativeModel>(model: &M, word: &str, feature: Feature) -> String {
    let (task, instruction, prompt) = match feature {
        Feature::Sentence => (
            Task::Sentence,
            SENTENCE_INSTRUCTION,
            format!(
                "For the Najdi Arabic word \"{word}\", provide one simple example sentence in Arabic, followed by its English translation on a new line. Format: [ARABIC SENTENCE]\n[ENGLISH TRANSLATION]."
            ),
        ),
        Feature::Pronunciation => (
            Task::Pronunciation,
            PRONUNCIATION_INSTRUCTION,
            format!(
                "Provide the closest, simplest, and most human-readable English phonetic transliteration (pronunciation guide) for the Najdi Arabic word \"{word}\". Only output the phonetic text."
            ),
        ),
    };

    let payload = RelayPayload::new(prompt).with_system_instruction(instruction);
    match request_text(model, task, payload).await {
        Ok(result) => result.trim().to_string(),
        Err(e) => {
            log::error!("Gemini {} error for {:?}: {}", feature.as_str(), word, e);
            format!("[Error fetching {}]", feature.as_str())
        }
    }
}

/// Spoken form of a word as a playable WAV file
pub async fn speak<M: GenerativeModel>(model: &M, word: &str) -> Result<Vec<u8>, EnrichError> {
    let payload = RelayPayload::new(format!(
        "Say the Najdi Arabic word \"{word}\". Speak with a clear, local Najdi accent."
    ));

    match relay::dispatch(model, Task::Tts, &payload).await? {
        RelayResponse::Audio {
            audio_data,
            mime_type,
        } => Ok(audio::l16_to_wav(&audio_data, &mime_type)?),
        RelayResponse::Text { .. } => Err(EnrichError::UnexpectedResponse(Task::Tts.as_str())),
    }
}
