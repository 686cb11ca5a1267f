//! The [`ReplyBackend`] trait and startup-time backend selection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use replypane_types::config::BackendConfig;
use replypane_types::{BackendMode, GenerationRequest};
use tracing::info;

use crate::error::{GenerationError, Result};
use crate::http::HttpBackend;
use crate::mock::MockBackend;
use crate::model::ModelBackend;

/// Produces reply text for an email context.
///
/// Implementations handle the protocol for one kind of backend. Selection
/// is static: [`build_backend`] picks one from configuration at startup.
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    /// Short name for logs and status output.
    fn name(&self) -> &str;

    /// Generate a reply.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] on transport failure, a non-success
    /// response, missing configuration or timeout.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Build the backend named by `config.mode`.
pub fn build_backend(config: &BackendConfig) -> Result<Arc<dyn ReplyBackend>> {
    let backend: Arc<dyn ReplyBackend> = match config.mode {
        BackendMode::Mock => Arc::new(MockBackend::new()),
        BackendMode::Http => Arc::new(HttpBackend::new(config.http.clone())?),
        BackendMode::Model => Arc::new(ModelBackend::new(config.model.clone())?),
    };
    info!(backend = backend.name(), "reply backend ready");
    Ok(backend)
}

/// A reqwest client with the given request timeout.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(GenerationError::Http)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_mock() {
        let backend = build_backend(&BackendConfig::default()).unwrap();
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn each_mode_builds() {
        for (mode, name) in [
            (BackendMode::Http, "http"),
            (BackendMode::Model, "model"),
            (BackendMode::Mock, "mock"),
        ] {
            let config = BackendConfig {
                mode,
                ..BackendConfig::default()
            };
            assert_eq!(build_backend(&config).unwrap().name(), name);
        }
    }
}
