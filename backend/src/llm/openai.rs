//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ExplainerError, ExplanationGenerator};
use crate::config::LlmConfig;

pub const SYSTEM_MESSAGE: &str =
    "You are a helpful explainer who breaks ideas into structured, rhetorical parts.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// The user turn sent for a prompt and optional structure outline.
pub fn user_message(prompt: &str, structure: Option<&str>) -> String {
    format!(
        "Topic: {}\n\nStructure:\n{}\n\nExplain this topic using the structure above. Focus on keywords in user prompt, particularly languages or concepts",
        prompt,
        structure.unwrap_or("")
    )
}

pub struct OpenAiGenerator {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self, ExplainerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExplainerError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ExplanationGenerator for OpenAiGenerator {
    async fn explain(
        &self,
        prompt: &str,
        structure: Option<&str>,
    ) -> Result<String, ExplainerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ExplainerError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_MESSAGE.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_message(prompt, structure),
                },
            ],
        };

        debug!("requesting completion from {} (model={})", self.api_url, self.model);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplainerError::Timeout
                } else {
                    ExplainerError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<empty response>".to_string());

        if !status.is_success() {
            warn!("explainer returned {}: {}", status, text.trim());
            return Err(ExplainerError::Status {
                status: status.as_u16(),
                body: text.trim().to_string(),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ExplainerError::Malformed(format!("{} ({})", e, text)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ExplainerError::Malformed("response has no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}
