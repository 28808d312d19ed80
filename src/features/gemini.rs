use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::data::models::GeminiError;

/// Base64 audio returned by a speech model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAudio {
    pub mime_type: String,
    pub data: String,
}

/// Prompt in, text or audio out
pub trait GenerativeModel: Clone + Send + Sync + 'static {
    fn is_configured(&self) -> bool;

    fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> impl Future<Output = Result<String, GeminiError>> + Send;

    fn generate_speech(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<InlineAudio, GeminiError>> + Send;
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    settings: Arc<GeminiSettings>,
}

struct GeminiSettings {
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    tts_model: String,
    voice: String,
}

// generateContent wire format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: [TextPart { text }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineAudio>,
}

impl GenerateResponse {
    fn parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    fn text(&self) -> Option<String> {
        let text: String = self.parts().iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    fn into_audio(self) -> Option<InlineAudio> {
        let candidate = self.candidates.into_iter().next()?;
        candidate.content?.parts.into_iter().next()?.inline_data
    }
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, GeminiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            settings: Arc::new(GeminiSettings {
                api_key: config.gemini_api_key.clone(),
                base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
                text_model: config.gemini_text_model.clone(),
                tts_model: config.gemini_tts_model.clone(),
                voice: config.gemini_tts_voice.clone(),
            }),
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, GeminiError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GeminiError::MissingApiKey)?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, model
        );

        log::debug!("POST {}", endpoint);
        let resp = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<GenerateResponse>().await?)
    }
}

impl GenerativeModel for GeminiClient {
    fn is_configured(&self) -> bool {
        self.settings.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, GeminiError> {
        let request = GenerateRequest {
            contents: [Content::text(prompt)],
            system_instruction: system_instruction.map(Content::text),
            generation_config: None,
        };

        self.generate_content(&self.settings.text_model, &request)
            .await?
            .text()
            .ok_or(GeminiError::EmptyResponse)
    }

    async fn generate_speech(&self, prompt: &str) -> Result<InlineAudio, GeminiError> {
        let request = GenerateRequest {
            contents: [Content::text(prompt)],
            system_instruction: None,
            generation_config: Some(json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.settings.voice }
                    }
                }
            })),
        };

        self.generate_content(&self.settings.tts_model, &request)
            .await?
            .into_audio()
            .ok_or(GeminiError::MissingAudio)
    }
}
