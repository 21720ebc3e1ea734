//! Google Gemini provider implementation

use super::types::{LlmMessage, LlmRequest, LlmResponse, MessageRole, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiModel {
    Gemini15Flash,
    Gemini15Pro,
}

impl GeminiModel {
    pub fn api_name(self) -> &'static str {
        match self {
            GeminiModel::Gemini15Flash => "gemini-1.5-flash",
            GeminiModel::Gemini15Pro => "gemini-1.5-pro",
        }
    }

    pub fn model_id(self) -> &'static str {
        self.api_name()
    }
}

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
    model_id: String,
    temperature: Option<f32>,
}

impl GeminiService {
    pub fn new(
        api_key: String,
        model: GeminiModel,
        gateway: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<Self, LlmError> {
        let base_url = match gateway {
            Some(gw) => format!(
                "{}/gemini/v1beta/models/{}:generateContent",
                gw.trim_end_matches('/'),
                model.api_name()
            ),
            None => format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                model.api_name()
            ),
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model_id: model.model_id().to_string(),
            temperature,
        })
    }

    pub(super) fn translate_request(&self, request: &LlmRequest) -> GeminiRequest {
        let system_instruction = request
            .system
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: text.clone() }],
            });

        GeminiRequest {
            contents: translate_messages(&request.messages),
            system_instruction,
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature.or(self.temperature),
            }),
        }
    }

    pub(super) fn normalize_response(resp: GeminiResponse) -> Result<LlmResponse, LlmError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No candidates in response"))?;

        let parts: Vec<String> = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .collect();

        if parts.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("none");
            return Err(LlmError::unknown(format!(
                "Empty response from model (finish reason: {reason})"
            )));
        }

        let end_turn = candidate.finish_reason.as_deref() == Some("STOP");
        let usage = resp.usage_metadata.unwrap_or_default();

        Ok(LlmResponse {
            parts,
            end_turn,
            usage: Usage {
                input_tokens: u64::from(usage.prompt_token_count),
                output_tokens: u64::from(usage.candidates_token_count),
            },
        })
    }
}

/// Convert history into Gemini contents; the API calls the assistant "model"
pub(super) fn translate_messages(messages: &[LlmMessage]) -> Vec<GeminiContent> {
    messages
        .iter()
        .filter(|m| !m.text.is_empty())
        .map(|m| GeminiContent {
            role: Some(
                match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart {
                text: m.text.clone(),
            }],
        })
        .collect()
}

fn classify_status(status: reqwest::StatusCode, message: &str) -> LlmError {
    match status.as_u16() {
        400 => LlmError::invalid_request(format!("Invalid request: {message}")),
        401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
        429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
        500..=599 => LlmError::server_error(format!("Server error: {message}")),
        _ => LlmError::unknown(format!("HTTP {status}: {message}")),
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let gemini_request = self.translate_request(request);

        let mut builder = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .json(&gemini_request);

        // Gateway mode authenticates on our behalf
        if self.api_key != "implicit" {
            builder = builder.header("x-goog-api-key", &self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                LlmError::network(format!("Connection failed: {e}"))
            } else {
                LlmError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |r| r.error.message);
            return Err(classify_status(status, &message));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use serde_json::json;

    fn service(gateway: Option<&str>) -> GeminiService {
        GeminiService::new("key".to_string(), GeminiModel::Gemini15Flash, gateway, Some(0.5))
            .unwrap()
    }

    #[test]
    fn test_direct_and_gateway_urls() {
        assert_eq!(
            service(None).base_url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            service(Some("http://gw.local/llm/")).base_url,
            "http://gw.local/llm/gemini/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let request = LlmRequest {
            system: None,
            messages: vec![LlmMessage::user("Hello"), LlmMessage::assistant("Hi!")],
            max_tokens: None,
            temperature: None,
        };
        let wire = serde_json::to_value(service(None).translate_request(&request)).unwrap();
        assert_eq!(
            wire,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "Hello" }] },
                    { "role": "model", "parts": [{ "text": "Hi!" }] }
                ],
                "generationConfig": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn test_normalize_response() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hi " }, { "text": "there" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6 }
        }))
        .unwrap();
        let response = GeminiService::normalize_response(resp).unwrap();
        assert_eq!(response.text(), "Hi there");
        assert!(response.end_turn);
        assert_eq!(response.usage.input_tokens, 4);
        assert_eq!(response.usage.output_tokens, 2);
    }

    #[test]
    fn test_safety_block_is_an_error() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        let err = GeminiService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Unknown);
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_status_classification() {
        use reqwest::StatusCode;
        assert_eq!(classify_status(StatusCode::BAD_REQUEST, "x").kind, LlmErrorKind::InvalidRequest);
        assert_eq!(classify_status(StatusCode::FORBIDDEN, "x").kind, LlmErrorKind::Auth);
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS, "x").kind, LlmErrorKind::RateLimit);
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY, "x").kind, LlmErrorKind::ServerError);
        assert_eq!(classify_status(StatusCode::IM_A_TEAPOT, "x").kind, LlmErrorKind::Unknown);
    }
}
