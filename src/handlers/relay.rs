use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    data::models::{RelayError, RelayRequest, RelayResponse},
    features::{gemini::GenerativeModel, relay},
    AppState,
};

// Main handler for all Gemini requests from the frontend
pub async fn relay<M: GenerativeModel>(
    State(state): State<AppState<M>>,
    body: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, RelayError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected relay body: {}", rejection);
            RelayRequest::default()
        }
    };

    let (task, payload) = relay::validate_request(&state.model, request)?;
    log::info!("Relaying {} task", task.as_str());

    relay::dispatch(&state.model, task, &payload)
        .await
        .map(Json)
        .map_err(|e| {
            if let RelayError::Upstream(inner) = &e {
                log::error!("Backend Gemini API Error: {}", inner);
            }
            e
        })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::testing::{test_router, FakeModel};

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/api/gemini")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn text_task_returns_result() {
        let app = test_router(FakeModel::new().with_text("مَرْحَبا"));

        let (status, body) = post_json(
            app,
            r#"{"task": "harakat", "payload": {"prompt": "vowelize", "systemInstruction": "linguist"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "مَرْحَبا" }));
    }

    #[tokio::test]
    async fn tts_task_returns_audio_fields() {
        let app = test_router(FakeModel::new().with_audio("AAA=", "audio/L16;codec=pcm;rate=24000"));

        let (status, body) = post_json(app, r#"{"task": "tts", "payload": {"prompt": "say"}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "audioData": "AAA=", "mimeType": "audio/L16;codec=pcm;rate=24000" })
        );
    }

    #[tokio::test]
    async fn missing_payload_is_bad_request() {
        let app = test_router(FakeModel::new());

        let (status, body) = post_json(app, r#"{"task": "sentence"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing 'task' or 'payload' in request body.");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn unknown_task_is_bad_request() {
        let app = test_router(FakeModel::new());

        let (status, body) = post_json(app, r#"{"task": "poem", "payload": {"prompt": "x"}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown task: poem");
    }

    #[tokio::test]
    async fn missing_api_key_is_server_error() {
        let app = test_router(FakeModel::unconfigured());

        let (status, body) = post_json(app, r#"{"task": "tts", "payload": {"prompt": "x"}}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "API key is not configured on the server.");
    }

    #[tokio::test]
    async fn upstream_failure_is_generic_server_error() {
        let app = test_router(FakeModel::new().failing());

        let (status, body) =
            post_json(app, r#"{"task": "translation", "payload": {"prompt": "x"}}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process request on the server.");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = test_router(FakeModel::new());

        let (status, _) = post_json(app, "not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
