use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;

use crate::config::Settings;
use crate::stt::client::SpeechToText;
use crate::{GavelError, Result};

const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Groq-hosted Whisper transcription client.
pub struct GroqSttClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqSttClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.stt.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(GavelError::Config(
                "Groq API key is missing. Set stt.api_key in config or GAVEL_GROQ_API_KEY."
                    .to_string(),
            ));
        }

        let endpoint = if settings.stt.endpoint.trim().is_empty() {
            DEFAULT_GROQ_ENDPOINT.to_string()
        } else {
            settings.stt.endpoint.trim().trim_end_matches('/').to_string()
        };

        Ok(Self {
            // Uploading a ten-minute segment can legitimately take a while.
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .map_err(|e| GavelError::Other(format!("Failed to build HTTP client: {e}")))?,
            api_key,
            model: settings.stt.model.trim().to_string(),
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/audio/transcriptions", self.endpoint)
    }
}

#[async_trait]
impl SpeechToText for GroqSttClient {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("segment.wav")
            .to_string();
        let bytes = tokio::fs::read(audio).await?;

        tracing::debug!("Uploading {} ({} bytes) for transcription", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| GavelError::Other(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "json")
            .text("temperature", "0");

        let response = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| GavelError::Other(format!("Failed to parse transcription response: {e}")))?;

        Ok(payload.text.trim().to_string())
    }
}

/// Connection-level failures are treated as transient outages.
fn transport_error(err: reqwest::Error) -> GavelError {
    GavelError::ServiceUnavailable(err.to_string())
}

fn status_error(status: StatusCode, body: &str) -> GavelError {
    let detail = format!("{status}: {}", body.chars().take(200).collect::<String>());
    match status {
        StatusCode::TOO_MANY_REQUESTS => GavelError::RateLimited(detail),
        s if s.is_server_error() => GavelError::ServiceUnavailable(detail),
        _ => GavelError::InvalidInput(detail),
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
