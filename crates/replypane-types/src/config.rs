//! Configuration schema.
//!
//! Loaded from JSON (see [`config_loader`](crate::config_loader)); every
//! section has defaults so an empty object is a valid config that runs the
//! offline mock backend.

use serde::{Deserialize, Serialize};

use crate::email::{DEFAULT_MAX_BODY_CHARS, Tone};
use crate::secret::SecretString;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Which generation backend is wired in at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Deterministic templated replies, no network.
    #[default]
    Mock,
    /// POST the context to a reply service and use the raw response text.
    Http,
    /// OpenAI-compatible chat completion endpoint.
    Model,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Mock => "mock",
            BackendMode::Http => "http",
            BackendMode::Model => "model",
        }
    }
}

/// Generation backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,

    #[serde(default)]
    pub http: HttpBackendConfig,

    #[serde(default)]
    pub model: ModelBackendConfig,
}

/// Payload shape sent by the HTTP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadContract {
    /// `{ subject, bodyPreview }`
    #[default]
    Minimal,
    /// The minimal fields plus sender, recipients, attachments, timestamp,
    /// tone and intent.
    Extended,
}

/// Settings for the plain HTTP reply service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    /// Endpoint receiving the POST. Empty means not configured.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub contract: PayloadContract,

    /// Characters of body sent as `bodyPreview`.
    #[serde(default = "default_max_body_chars")]
    pub preview_chars: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            contract: PayloadContract::default(),
            preview_chars: default_max_body_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for the OpenAI-compatible model backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Explicit API key. Takes precedence over `api_key_env`; prefer the
    /// environment variable so keys stay out of config files.
    #[serde(default)]
    pub api_key: SecretString,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelBackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            api_key: SecretString::default(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Body format used when writing into the host item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryFormat {
    #[default]
    Text,
    Html,
}

/// Mail host options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Body characters kept when capturing the email context.
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,

    #[serde(default)]
    pub delivery_format: DeliveryFormat,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_body_chars: default_max_body_chars(),
            delivery_format: DeliveryFormat::default(),
        }
    }
}

/// Initial panel settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub tone: Tone,
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_max_tokens() -> u32 {
    800
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_body_chars() -> usize {
    DEFAULT_MAX_BODY_CHARS
}
