use validator::Validate;

use crate::data::models::{RelayError, RelayPayload, RelayRequest, RelayResponse, Task};
use crate::features::gemini::GenerativeModel;

/// Validates a raw relay request into a task and payload
pub fn validate_request<M: GenerativeModel>(
    model: &M,
    request: RelayRequest,
) -> Result<(Task, RelayPayload), RelayError> {
    if !model.is_configured() {
        return Err(RelayError::MissingApiKey);
    }

    let (Some(task), Some(payload)) = (request.task, request.payload) else {
        return Err(RelayError::MissingFields);
    };
    if task.is_empty() {
        return Err(RelayError::MissingFields);
    }

    let task = Task::parse(&task).ok_or(RelayError::UnknownTask(task))?;
    payload.validate()?;

    Ok((task, payload))
}

/// Forwards one task to the model and reshapes the reply
pub async fn dispatch<M: GenerativeModel>(
    model: &M,
    task: Task,
    payload: &RelayPayload,
) -> Result<RelayResponse, RelayError> {
    if !model.is_configured() {
        return Err(RelayError::MissingApiKey);
    }

    let response = match task {
        Task::Tts => {
            let audio = model.generate_speech(&payload.prompt).await?;
            RelayResponse::Audio {
                audio_data: audio.data,
                mime_type: audio.mime_type,
            }
        }
        Task::Harakat | Task::Translation | Task::Sentence | Task::Pronunciation => {
            let result = model
                .generate_text(&payload.prompt, payload.system_instruction.as_deref())
                .await?;
            RelayResponse::Text { result }
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeModel;

    fn request(task: Option<&str>, prompt: Option<&str>) -> RelayRequest {
        RelayRequest {
            task: task.map(str::to_string),
            payload: prompt.map(RelayPayload::new),
        }
    }

    #[test]
    fn missing_key_is_reported_before_missing_fields() {
        let err = validate_request(&FakeModel::unconfigured(), request(None, None)).unwrap_err();

        assert!(matches!(err, RelayError::MissingApiKey));
    }

    #[test]
    fn missing_task_or_payload_is_rejected() {
        let model = FakeModel::new();

        assert!(matches!(
            validate_request(&model, request(None, Some("hi"))),
            Err(RelayError::MissingFields)
        ));
        assert!(matches!(
            validate_request(&model, request(Some("tts"), None)),
            Err(RelayError::MissingFields)
        ));
    }

    #[test]
    fn unknown_task_is_rejected_by_name() {
        let err = validate_request(&FakeModel::new(), request(Some("summarize"), Some("hi")))
            .unwrap_err();

        assert_eq!(err.to_string(), "Unknown task: summarize");
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = validate_request(&FakeModel::new(), request(Some("harakat"), Some("")))
            .unwrap_err();

        assert!(matches!(err, RelayError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn text_tasks_forward_prompt_and_system_instruction() {
        let model = FakeModel::new().with_text("نَجْدي");
        let payload = RelayPayload::new("vowelize").with_system_instruction("linguist");

        let response = dispatch(&model, Task::Harakat, &payload).await.unwrap();

        assert_eq!(
            response,
            RelayResponse::Text {
                result: "نَجْدي".to_string()
            }
        );
        let calls = model.text_calls();
        assert_eq!(calls, vec![("vowelize".to_string(), Some("linguist".to_string()))]);
    }

    #[tokio::test]
    async fn tts_returns_audio_and_mime_type() {
        let model = FakeModel::new().with_audio("AAA=", "audio/L16;codec=pcm;rate=24000");

        let response = dispatch(&model, Task::Tts, &RelayPayload::new("say it"))
            .await
            .unwrap();

        assert_eq!(
            response,
            RelayResponse::Audio {
                audio_data: "AAA=".to_string(),
                mime_type: "audio/L16;codec=pcm;rate=24000".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn upstream_failure_becomes_generic_error() {
        let model = FakeModel::new().failing();

        let err = dispatch(&model, Task::Sentence, &RelayPayload::new("x"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to process request on the server.");
    }
}
