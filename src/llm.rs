//! Remote language model client.
//!
//! Talks the OpenAI completions protocol against a configured base URL, so
//! any compatible server (vLLM, llama.cpp server, LM Studio) works. The
//! credential is a placeholder: self-hosted endpoints require the header to
//! be present but do not validate it.
//!
//! There are no retries here. A transport or server failure fails the
//! current turn and the orchestrator commits nothing.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::PipelineError;

/// Placeholder bearer credential for self-hosted OpenAI-compatible servers.
const PLACEHOLDER_API_KEY: &str = "EMPTY";

/// A prompt-in, text-out language model. The two call sites are question
/// condensation and answer generation; both go through the same endpoint.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, PipelineError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    top_p: f64,
    temperature: f64,
    presence_penalty: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

/// Client for an OpenAI-compatible `/v1/completions` endpoint with fixed
/// decoding parameters taken from deployment configuration.
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl OpenAiCompatClient {
    pub fn new(config: ModelConfig) -> Result<Self, PipelineError> {
        // Long timeout: self-hosted models can be slow, and a turn blocks
        // until the transport returns or errors.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::RemoteModel(e.to_string()))?;

        tracing::info!(model = %config.name, url = %config.base_url, "completion client ready");

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> Result<String, PipelineError> {
        let request = CompletionRequest {
            model: &self.config.name,
            prompt,
            max_tokens: self.config.max_new_tokens,
            top_p: self.config.top_p,
            temperature: self.config.temperature,
            presence_penalty: self.config.presence_penalty,
            stream: false,
        };

        let url = format!("{}/v1/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", PLACEHOLDER_API_KEY))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PipelineError::RemoteModel(format!(
                    "failed to reach {}: {}",
                    self.config.base_url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::RemoteModel(format!(
                "inference server returned {}: {}",
                status, body
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::RemoteModel(format!("malformed response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| PipelineError::RemoteModel("response had no choices".to_string()))?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_fixed_decoding_parameters() {
        let request = CompletionRequest {
            model: "mistral-7b",
            prompt: "Hello",
            max_tokens: 512,
            top_p: 0.95,
            temperature: 0.01,
            presence_penalty: 1.03,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mistral-7b");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["stream"], false);
        assert!((json["presence_penalty"].as_f64().unwrap() - 1.03).abs() < 1e-9);
    }

    #[test]
    fn response_parses_first_choice_text() {
        let body = r#"{"choices":[{"text":" Paris is the capital."}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].text, " Paris is the capital.");
    }
}
