//! OpenAI-compatible chat-completions collaborator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use polisbot_core::{ChatTurn, Collaborator, IntakeError};

/// Bounded timeout for one collaborator call; a hung call degrades the same
/// way as any other collaborator failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completions collaborator over any OpenAI-compatible endpoint.
pub struct OpenAiCollaborator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCollaborator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn error(&self, message: impl Into<String>) -> IntakeError {
        IntakeError::Collaborator {
            provider: self.name().to_string(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

#[async_trait]
impl Collaborator for OpenAiCollaborator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn converse(&self, history: &[ChatTurn], prompt: &str) -> Result<String, IntakeError> {
        let mut messages: Vec<WireMessage> = history
            .iter()
            .map(|turn| WireMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            })
            .collect();
        messages.push(WireMessage { role: "user".to_string(), content: prompt.to_string() });

        let body = ChatRequest { model: self.model.clone(), messages, temperature: 0.2 };

        debug!(model = %self.model, turns = history.len(), "sending collaborator request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.error(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.error(format!("endpoint returned {status}: {error_body}")));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.error(format!("malformed response: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| self.error("response carried no choices"))
    }
}
