use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tera::Tera;
use tokio::sync::{Notify, Semaphore};
use tower::ServiceExt;

use crate::config::Config;
use crate::data::models::GeminiError;
use crate::features::gemini::{GenerativeModel, InlineAudio};

type Responder = dyn Fn(&str, Option<&str>) -> Option<String> + Send + Sync;

/// Holds model calls until the test lets them through
pub struct Gate {
    entered: Notify,
    permits: Semaphore,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            permits: Semaphore::new(0),
        })
    }

    /// Resolves once a call is waiting at the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self, calls: usize) {
        self.permits.add_permits(calls);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

/// In-memory stand-in for the Gemini API
///
/// Text calls are answered by a responder closure (`None` means an upstream
/// failure); every call is recorded so tests can inspect prompts.
#[derive(Clone)]
pub struct FakeModel {
    configured: bool,
    failing: bool,
    responder: Arc<Responder>,
    audio: Option<InlineAudio>,
    text_gate: Option<Arc<Gate>>,
    speech_gate: Option<Arc<Gate>>,
    text_calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
    speech_calls: Arc<Mutex<Vec<String>>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self {
            configured: true,
            failing: false,
            responder: Arc::new(|_, _| Some(String::new())),
            audio: None,
            text_gate: None,
            speech_gate: None,
            text_calls: Arc::default(),
            speech_calls: Arc::default(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        let text = text.to_string();
        self.with_responder(move |_, _| Some(text.clone()))
    }

    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.responder = Arc::new(responder);
        self
    }

    pub fn with_audio(mut self, data: &str, mime_type: &str) -> Self {
        self.audio = Some(InlineAudio {
            data: data.to_string(),
            mime_type: mime_type.to_string(),
        });
        self
    }

    pub fn with_text_gate(mut self, gate: Arc<Gate>) -> Self {
        self.text_gate = Some(gate);
        self
    }

    pub fn with_speech_gate(mut self, gate: Arc<Gate>) -> Self {
        self.speech_gate = Some(gate);
        self
    }

    pub fn text_calls(&self) -> Vec<(String, Option<String>)> {
        self.text_calls.lock().unwrap().clone()
    }

    pub fn speech_calls(&self) -> Vec<String> {
        self.speech_calls.lock().unwrap().clone()
    }

    fn upstream_error() -> GeminiError {
        GeminiError::Status {
            code: 503,
            body: "fake upstream failure".to_string(),
        }
    }
}

impl GenerativeModel for FakeModel {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, GeminiError> {
        self.text_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_instruction.map(str::to_string)));
        if let Some(gate) = &self.text_gate {
            gate.pass().await;
        }

        if self.failing {
            return Err(Self::upstream_error());
        }
        (self.responder)(prompt, system_instruction).ok_or_else(Self::upstream_error)
    }

    async fn generate_speech(&self, prompt: &str) -> Result<InlineAudio, GeminiError> {
        self.speech_calls.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.speech_gate {
            gate.pass().await;
        }

        if self.failing {
            return Err(Self::upstream_error());
        }
        self.audio.clone().ok_or(GeminiError::MissingAudio)
    }
}

/// Full application router backed by `model` and default configuration
pub fn test_router(model: FakeModel) -> Router {
    let config = Config::from_lookup(|_| None).unwrap();
    let templates = Tera::new(&config.templates_glob).unwrap();
    crate::build_router(model, Arc::new(templates), &config)
}

/// Drives a router while carrying the session cookie between requests
///
/// Clones share the cookie, so one visitor can have requests in flight
/// on several tasks.
#[derive(Clone)]
pub struct SessionClient {
    app: Router,
    cookie: Arc<Mutex<Option<String>>>,
}

impl SessionClient {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            cookie: Arc::default(),
        }
    }

    async fn send(&self, mut request: Request<Body>) -> Response {
        let cookie = self.cookie.lock().unwrap().clone();
        if let Some(cookie) = cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            *self.cookie.lock().unwrap() = Some(pair.to_string());
        }
        response
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self.get(uri).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> StatusCode {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await.status()
    }
}
