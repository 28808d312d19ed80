use lazy_static::lazy_static;
use regex::Regex;

use crate::data::models::{PendingWord, VocabEntry};

lazy_static! {
    static ref SEPARATOR_RE: Regex = Regex::new(r"[-–—,:]").unwrap();
    static ref ARABIC_RUN_RE: Regex = Regex::new(r"[\u0600-\u06FF]+").unwrap();
    static ref SYNONYM_RE: Regex = Regex::new(r"\s*[/,]\s*").unwrap();
}

/// Input lines sorted into glossed pairs and words still needing a translation
#[derive(Debug, Default, PartialEq)]
pub struct ParsedInput {
    pub complete: Vec<VocabEntry>,
    pub pending: Vec<PendingWord>,
}

pub fn parse_input(text: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();

    for (line_no, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line_no, line) {
            ParsedLine::Pair(entry) => parsed.complete.push(entry),
            ParsedLine::Pending(word) => parsed.pending.push(word),
        }
    }

    parsed
}

#[derive(Debug, PartialEq)]
pub enum ParsedLine {
    Pair(VocabEntry),
    Pending(PendingWord),
}

pub fn parse_line(line_no: usize, line: &str) -> ParsedLine {
    if !SEPARATOR_RE.is_match(line) {
        return ParsedLine::Pending(PendingWord {
            line: line_no,
            arabic: line.trim().to_string(),
        });
    }

    let mut parts = SEPARATOR_RE.split(line);
    let head = parts.next().unwrap_or_default();
    let english = parts.collect::<Vec<_>>().join(" ").trim().to_string();

    ParsedLine::Pair(VocabEntry::new(line_no, extract_arabic(head), english))
}

/// Keeps only Arabic-script runs, joined by spaces; slashes between runs survive
pub fn extract_arabic(segment: &str) -> String {
    segment
        .split('/')
        .map(|piece| {
            ARABIC_RUN_RE
                .find_iter(piece)
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Expands `a/b` or `a, b` entries into one entry per synonym sharing the gloss
pub fn split_synonyms(mut entries: Vec<VocabEntry>) -> Vec<VocabEntry> {
    entries.sort_by_key(|entry| entry.line);

    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.arabic.is_empty() || !entry.is_translated() || !SYNONYM_RE.is_match(&entry.arabic)
        {
            result.push(entry);
            continue;
        }

        let words: Vec<&str> = SYNONYM_RE
            .split(&entry.arabic)
            .filter(|w| !w.is_empty())
            .collect();

        for (k, word) in words.into_iter().enumerate() {
            result.push(VocabEntry {
                id: format!("{}_syn{}", entry.id, k),
                arabic: word.to_string(),
                harakat: Some(word.to_string()),
                sentence: None,
                pronunciation: None,
                ..entry.clone()
            });
        }
    }

    result
}

/// Drops entries left without an Arabic side or a gloss
pub fn finalize(entries: Vec<VocabEntry>) -> Vec<VocabEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.arabic.is_empty() && !entry.english.is_empty())
        .collect()
}

/// Plain-text rendering used for download and clipboard copy
pub fn export_text(entries: &[VocabEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} - {}", entry.arabic, entry.english))
        .collect::<Vec<_>>()
        .join("\n")
}
