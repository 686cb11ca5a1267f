//! Plain HTTP reply service backend.
//!
//! POSTs the email context as JSON and uses the raw response text as the
//! reply. Two payload contracts exist; `minimal` is the default.

use async_trait::async_trait;
use replypane_types::config::HttpBackendConfig;
use replypane_types::email::truncate_chars;
use replypane_types::{GenerationRequest, Mailbox, PayloadContract, Tone};
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{ReplyBackend, http_client};
use crate::error::{GenerationError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MinimalPayload<'a> {
    subject: &'a str,
    body_preview: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtendedPayload<'a> {
    subject: &'a str,
    body_preview: String,
    sender: &'a Mailbox,
    recipients: &'a [Mailbox],
    attachments: &'a [String],
    received_at: &'a str,
    tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent: Option<&'a str>,
}

/// Backend posting to a user-configured reply service.
pub struct HttpBackend {
    config: HttpBackendConfig,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self> {
        let http = http_client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    /// The JSON body for `request` under the configured contract.
    pub fn payload(&self, request: &GenerationRequest) -> Result<serde_json::Value> {
        let ctx = &request.context;
        let body_preview = truncate_chars(&ctx.body, self.config.preview_chars);
        let value = match self.config.contract {
            PayloadContract::Minimal => serde_json::to_value(MinimalPayload {
                subject: &ctx.subject,
                body_preview,
            })?,
            PayloadContract::Extended => serde_json::to_value(ExtendedPayload {
                subject: &ctx.subject,
                body_preview,
                sender: &ctx.sender,
                recipients: &ctx.recipients,
                attachments: &ctx.attachments,
                received_at: &ctx.received_at,
                tone: request.tone,
                intent: request.intent.as_deref(),
            })?,
        };
        Ok(value)
    }
}

#[async_trait]
impl ReplyBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.config.url.trim();
        if url.is_empty() {
            return Err(GenerationError::ConfigMissing(
                "enter the reply service URL (backend.http.url)".into(),
            ));
        }

        let payload = self.payload(request)?;
        debug!(url, contract = ?self.config.contract, "posting to reply service");

        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(GenerationError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "reply service returned an error");
            return Err(GenerationError::BackendHttp {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(GenerationError::from_transport)?;
        debug!(chars = text.chars().count(), "reply service responded");
        Ok(text)
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("url", &self.config.url)
            .field("contract", &self.config.contract)
            .finish()
    }
}
