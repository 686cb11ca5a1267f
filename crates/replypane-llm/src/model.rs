//! OpenAI-compatible chat completion backend.
//!
//! Works with any endpoint accepting the OpenAI request format; point
//! `base_url` elsewhere to use another provider.

use async_trait::async_trait;
use replypane_types::config::ModelBackendConfig;
use replypane_types::{GenerationRequest, SecretString};
use tracing::{debug, warn};

use crate::backend::{ReplyBackend, http_client};
use crate::error::{GenerationError, Result};
use crate::prompt::{system_prompt, user_prompt};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// Used when the model answers with no choices or only whitespace.
pub const FALLBACK_REPLY: &str =
    "Thank you for your email. I have received your message and will get back to you shortly.";

/// Backend calling `{base_url}/chat/completions`.
pub struct ModelBackend {
    config: ModelBackendConfig,
    http: reqwest::Client,
}

impl ModelBackend {
    /// The API key is resolved per request: an explicit `api_key` wins,
    /// otherwise the variable named by `api_key_env` is read.
    pub fn new(config: ModelBackendConfig) -> Result<Self> {
        let http = http_client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ModelBackendConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    fn resolve_api_key(&self) -> Result<SecretString> {
        if !self.config.api_key.is_empty() {
            return Ok(self.config.api_key.clone());
        }
        SecretString::from_env(&self.config.api_key_env).ok_or_else(|| {
            GenerationError::ConfigMissing(format!(
                "set the {} env var or backend.model.apiKey",
                self.config.api_key_env
            ))
        })
    }

    /// The chat request sent for `request`.
    pub fn chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt(request.tone)),
                ChatMessage::user(user_prompt(request)),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl ReplyBackend for ModelBackend {
    fn name(&self) -> &str {
        "model"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.resolve_api_key()?;
        let chat = self.chat_request(request);

        debug!(
            model = %chat.model,
            tone = %request.tone,
            has_intent = request.intent.is_some(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", api_key.expose()))
            .json(&chat)
            .send()
            .await
            .map_err(GenerationError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::Backend {
                    message: format!("failed to parse response: {e}"),
                }
            }
        })?;

        debug!(
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            "chat completion response received"
        );

        match chat_response.first_text() {
            Some(text) => Ok(text.to_owned()),
            None => {
                warn!("model returned no usable content, using fallback reply");
                Ok(FALLBACK_REPLY.to_owned())
            }
        }
    }
}

/// Map a non-success status and body to an error.
fn classify_failure(status: u16, body: &str) -> GenerationError {
    let message = extract_error_message(body).unwrap_or_else(|| body.trim().to_owned());
    match status {
        401 | 403 => {
            warn!(status, "model endpoint rejected the credential");
            GenerationError::InvalidCredential(message)
        }
        429 => {
            warn!(status, "model endpoint quota or rate limit hit");
            let message = if message.is_empty() {
                "rate limit or quota exceeded".to_owned()
            } else {
                message
            };
            GenerationError::QuotaExceeded(message)
        }
        _ if is_quota_exhausted(body) => {
            warn!(status, "model endpoint reported exhausted quota");
            GenerationError::QuotaExceeded(message)
        }
        _ => {
            warn!(status, "model endpoint returned an error");
            GenerationError::Backend {
                message: format!("HTTP {status}: {message}"),
            }
        }
    }
}

/// True when an error body describes exhausted credits or billing trouble.
fn is_quota_exhausted(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("exhausted")
        || lower.contains("spending limit")
        || lower.contains("billing")
        || lower.contains("quota exceeded")
        || lower.contains("insufficient_quota")
}

/// Pull a human-readable message out of a JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        // {"error": {"message": "..."}}
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            // {"error": "..."}
            .or_else(|| v.as_str().map(String::from))
    })
}

impl std::fmt::Debug for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBackend")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &self.config.api_key)
            .finish()
    }
}
