use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::{Summarizer, SummaryRequest};
use crate::llm::prompts::{build_summary_prompt, SYSTEM_PROMPT};
use crate::{GavelError, Result};

const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Groq chat-completions client used for summarization.
pub struct GroqChatClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqChatClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(GavelError::Config(
                "Groq API key is missing. Set llm.api_key in config or GAVEL_GROQ_API_KEY."
                    .to_string(),
            ));
        }

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_GROQ_ENDPOINT.to_string()
        } else {
            settings.llm.endpoint.trim().trim_end_matches('/').to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .map_err(|e| GavelError::Other(format!("Failed to build HTTP client: {e}")))?,
            api_key,
            model: settings.llm.model.trim().to_string(),
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl Summarizer for GroqChatClient {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String> {
        let prompt = build_summary_prompt(request.title, request.transcript);

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature: 0.3,
            max_tokens: 2000,
        };

        let response = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GavelError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GavelError::Other(format!("Failed to parse summary response: {e}")))?;

        let summary = payload
            .choices
            .into_iter()
            .filter_map(|c| c.message.map(|m| m.content))
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
            .ok_or_else(|| {
                GavelError::Other("Summary response did not contain any text".to_string())
            })?;

        Ok(summary)
    }
}

fn status_error(status: StatusCode, body: &str) -> GavelError {
    let detail = format!("{status}: {}", body.chars().take(200).collect::<String>());
    match status {
        StatusCode::TOO_MANY_REQUESTS => GavelError::RateLimited(detail),
        StatusCode::PAYLOAD_TOO_LARGE => GavelError::ContextTooLarge(detail),
        StatusCode::BAD_REQUEST if mentions_context_limit(body) => {
            GavelError::ContextTooLarge(detail)
        }
        s if s.is_server_error() => GavelError::ServiceUnavailable(detail),
        _ => GavelError::InvalidInput(detail),
    }
}

/// Groq reports an oversized prompt as a 400 whose body names the token limit.
fn mentions_context_limit(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("context_length") || lower.contains("tokens") || lower.contains("too large")
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_config_error() {
        let settings = Settings::default();
        let err = match GroqChatClient::from_settings(&settings) {
            Ok(_) => panic!("expected client creation to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, GavelError::Config(_)));
    }

    #[test]
    fn oversized_transcript_maps_to_context_too_large() {
        assert!(matches!(
            status_error(StatusCode::PAYLOAD_TOO_LARGE, ""),
            GavelError::ContextTooLarge(_)
        ));
        assert!(matches!(
            status_error(
                StatusCode::BAD_REQUEST,
                "Request exceeds the model's context_length of 128000 tokens"
            ),
            GavelError::ContextTooLarge(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "invalid model"),
            GavelError::InvalidInput(_)
        ));
    }

    #[test]
    fn rate_limit_and_outage_are_transient() {
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(status_error(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(!status_error(StatusCode::UNPROCESSABLE_ENTITY, "").is_transient());
    }
}
