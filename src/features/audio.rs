//! PCM to WAV wrapping
//!
//! The TTS endpoint returns raw 16-bit little-endian PCM (`audio/L16`), which
//! browsers will not play without a RIFF/WAVE container around it.

use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;

use crate::data::models::AudioError;

pub const WAV_HEADER_LEN: usize = 44;
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

lazy_static! {
    static ref RATE_RE: Regex = Regex::new(r"rate=(\d+)").unwrap();
}

/// Wraps mono 16-bit samples in a 44-byte RIFF/WAVE header
///
/// Fails when the rate is zero or the sizes overflow the header's u32 fields.
pub fn pcm_to_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    if sample_rate == 0 {
        return Err(AudioError::OutOfRange("sample rate is zero"));
    }
    let byte_rate = sample_rate
        .checked_mul(BLOCK_ALIGN as u32)
        .ok_or(AudioError::OutOfRange("sample rate too large"))?;
    let data_len = samples
        .len()
        .checked_mul(BLOCK_ALIGN as usize)
        .and_then(|len| u32::try_from(len).ok())
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(AudioError::OutOfRange("too many samples"))?;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(wav)
}

pub fn is_l16(mime_type: &str) -> bool {
    mime_type.starts_with("audio/L16;")
}

pub fn sample_rate_from_mime(mime_type: &str) -> u32 {
    RATE_RE
        .captures(mime_type)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Decodes base64 little-endian PCM; a trailing odd byte is dropped
pub fn decode_pcm16(audio_data: &str) -> Result<Vec<i16>, AudioError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(audio_data)?;
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Turns a TTS `{audioData, mimeType}` pair into a playable WAV file
pub fn l16_to_wav(audio_data: &str, mime_type: &str) -> Result<Vec<u8>, AudioError> {
    if audio_data.is_empty() || !is_l16(mime_type) {
        return Err(AudioError::UnsupportedMime(mime_type.to_string()));
    }

    let samples = decode_pcm16(audio_data)?;
    pcm_to_wav(&samples, sample_rate_from_mime(mime_type))
}
