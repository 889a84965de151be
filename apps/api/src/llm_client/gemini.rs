//! Primary provider: Google Gemini `generateContent`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{read_json, LlmError, LlmProvider};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(client: Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let body: GenerateContentResponse = read_json(response).await?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                self.model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        body.text().ok_or_else(|| {
            if let Some(reason) = body
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                warn!("Gemini blocked the prompt: {reason}");
            }
            LlmError::EmptyContent
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::test_support::spawn_stub;
    use axum::{extract::Path, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn provider(base_url: String) -> GeminiProvider {
        GeminiProvider::new(
            Client::new(),
            "gm-key".to_string(),
            "gemini-flash-latest".to_string(),
            base_url,
        )
    }

    #[tokio::test]
    async fn test_complete_sends_prompt_as_single_user_turn() {
        let router = Router::new().route(
            "/models/:call",
            post(
                |Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(call, "gemini-flash-latest:generateContent");
                    assert_eq!(headers["x-goog-api-key"], "gm-key");
                    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
                    assert_eq!(body["contents"][0]["role"], "user");
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "write my resume");
                    Json(json!({
                        "candidates": [{
                            "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}
                        }],
                        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
                    }))
                },
            ),
        );
        let base = spawn_stub(router).await;

        let text = provider(base).complete("write my resume").await.unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}})),
                )
            }),
        );
        let base = spawn_stub(router).await;

        let err = provider(base).complete("x").await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_content() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async { Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})) }),
        );
        let base = spawn_stub(router).await;

        let err = provider(base).complete("x").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let p = provider("http://localhost:9/v1beta/".to_string());
        assert_eq!(
            p.endpoint(),
            "http://localhost:9/v1beta/models/gemini-flash-latest:generateContent"
        );
    }
}
