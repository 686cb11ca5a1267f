//! Adapter over a real host.
//!
//! Each host body operation takes a completion callback. The callback here
//! owns the sending half of a `oneshot` channel; the adapter awaits the
//! receiving half. If the host drops the callback without calling it, the
//! receiver resolves with an error and the operation fails instead of
//! hanging.

use std::sync::Arc;

use async_trait::async_trait;
use replypane_types::config::HostConfig;
use replypane_types::email::truncate_chars;
use replypane_types::{EmailContext, Mailbox};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::adapter::{MailContextAdapter, WriteMode};
use crate::error::{HostError, Result};
use crate::format::delivery_payload;
use crate::item::{AsyncResult, Callback, CoercionType, MailHost, MailboxItem};

const CALLBACK_DROPPED: &str = "host callback dropped without a result";
const NO_HOST_MESSAGE: &str = "host reported failure without a message";

/// Adapter bridging a [`MailHost`]'s callbacks to futures.
pub struct LiveMailAdapter {
    host: Arc<dyn MailHost>,
    config: HostConfig,
}

impl LiveMailAdapter {
    pub fn new(host: Arc<dyn MailHost>, config: HostConfig) -> Self {
        Self { host, config }
    }

    fn item(&self) -> Result<Arc<dyn MailboxItem>> {
        self.host.current_item().ok_or(HostError::NoItem)
    }
}

/// Start a callback-based host operation and wait for its result.
///
/// Returns `None` when the callback was dropped unanswered.
async fn bridge<T, F>(start: F) -> Option<AsyncResult<T>>
where
    T: Send + 'static,
    F: FnOnce(Callback<T>),
{
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |result| {
        // Receiver gone means the caller stopped waiting.
        let _ = tx.send(result);
    }));
    rx.await.ok()
}

fn failure_message<T>(result: &AsyncResult<T>) -> String {
    result
        .error
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| NO_HOST_MESSAGE.to_owned())
}

#[async_trait]
impl MailContextAdapter for LiveMailAdapter {
    fn is_host_available(&self) -> bool {
        self.host.current_item().is_some()
    }

    async fn extract_context(&self) -> Result<EmailContext> {
        let item = self.item()?;

        let reader = Arc::clone(&item);
        let result = bridge(move |cb| reader.body_get_async(CoercionType::Text, cb))
            .await
            .ok_or_else(|| HostError::Read {
                message: CALLBACK_DROPPED.to_owned(),
            })?;

        if !result.is_success() {
            let message = failure_message(&result);
            warn!(%message, "host body read failed");
            return Err(HostError::Read { message });
        }

        let body = result.value.unwrap_or_default();
        debug!(chars = body.chars().count(), "host body read");

        Ok(EmailContext {
            subject: item.subject(),
            body: truncate_chars(&body, self.config.max_body_chars),
            sender: item.from().unwrap_or_else(Mailbox::unknown),
            recipients: item.to(),
            attachments: item.attachments(),
            received_at: item
                .date_time_created()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        })
    }

    async fn write_body(&self, text: &str, mode: WriteMode) -> Result<()> {
        let item = self.item()?;
        if !item.is_composable() {
            return Err(HostError::NotComposable);
        }

        let (data, coercion) = delivery_payload(text, mode, self.config.delivery_format);
        debug!(mode = %mode, ?coercion, chars = data.chars().count(), "writing body");

        let writer = Arc::clone(&item);
        let result = bridge(move |cb| match mode {
            WriteMode::Replace => writer.body_set_async(data, coercion, cb),
            WriteMode::Prepend => writer.body_prepend_async(data, coercion, cb),
            WriteMode::InsertAtSelection => writer.body_set_selected_data_async(data, coercion, cb),
        })
        .await
        .ok_or_else(|| HostError::Write {
            message: CALLBACK_DROPPED.to_owned(),
        })?;

        if result.is_success() {
            Ok(())
        } else {
            let message = failure_message(&result);
            warn!(%message, "host body write failed");
            Err(HostError::Write { message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PREPEND_SEPARATOR;
    use crate::memory::{MemoryItem, MemoryMailHost};
    use chrono::{TimeZone, Utc};
    use replypane_types::DeliveryFormat;

    fn compose_host(body: &str) -> (Arc<MemoryMailHost>, LiveMailAdapter) {
        let host = Arc::new(MemoryMailHost::new(
            MemoryItem::message("Budget", body).in_compose_mode(),
        ));
        let adapter = LiveMailAdapter::new(host.clone(), HostConfig::default());
        (host, adapter)
    }

    #[tokio::test]
    async fn extracts_metadata_and_body() {
        let created = Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap();
        let item = MemoryItem::message("Budget", "Please review.")
            .with_sender(Mailbox::new("Ana", "ana@example.com"))
            .with_recipients(vec![Mailbox::new("", "team@example.com")])
            .with_attachments(vec!["budget.xlsx".into()])
            .with_created(created);
        let adapter = LiveMailAdapter::new(
            Arc::new(MemoryMailHost::new(item)),
            HostConfig::default(),
        );

        let ctx = adapter.extract_context().await.unwrap();
        assert_eq!(ctx.subject, "Budget");
        assert_eq!(ctx.body, "Please review.");
        assert_eq!(ctx.sender.address, "ana@example.com");
        assert_eq!(ctx.recipients.len(), 1);
        assert_eq!(ctx.attachments, vec!["budget.xlsx".to_string()]);
        assert_eq!(ctx.received_at, "2024-05-02T14:30:00+00:00");
    }

    #[tokio::test]
    async fn missing_sender_becomes_unknown() {
        let (_host, adapter) = compose_host("x");
        let ctx = adapter.extract_context().await.unwrap();
        assert!(ctx.sender.is_unknown());
        assert!(ctx.received_at.is_empty());
    }

    #[tokio::test]
    async fn body_is_truncated() {
        let host = Arc::new(MemoryMailHost::new(MemoryItem::message("S", &"é".repeat(20))));
        let config = HostConfig {
            max_body_chars: 8,
            ..HostConfig::default()
        };
        let adapter = LiveMailAdapter::new(host, config);
        let ctx = adapter.extract_context().await.unwrap();
        assert_eq!(ctx.body.chars().count(), 8);
    }

    #[tokio::test]
    async fn re_read_is_identical() {
        let (_host, adapter) = compose_host("same body");
        let first = adapter.extract_context().await.unwrap();
        let second = adapter.extract_context().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn read_failure_carries_host_message() {
        let item = MemoryItem::message("S", "B");
        item.fail_reads(Some("mailbox locked".into()));
        let adapter = LiveMailAdapter::new(
            Arc::new(MemoryMailHost::new(item)),
            HostConfig::default(),
        );
        let err = adapter.extract_context().await.unwrap_err();
        assert_eq!(
            err,
            HostError::Read {
                message: "mailbox locked".into()
            }
        );
    }

    #[tokio::test]
    async fn dropped_read_callback_is_an_error() {
        let item = MemoryItem::message("S", "B");
        item.drop_callbacks(true);
        let adapter = LiveMailAdapter::new(
            Arc::new(MemoryMailHost::new(item)),
            HostConfig::default(),
        );
        let err = adapter.extract_context().await.unwrap_err();
        assert!(matches!(err, HostError::Read { .. }));
    }

    #[tokio::test]
    async fn replace_then_read_back() {
        let (host, adapter) = compose_host("old");
        adapter.write_body("new reply", WriteMode::Replace).await.unwrap();
        let ctx = adapter.extract_context().await.unwrap();
        assert_eq!(ctx.body, "new reply");
        assert_eq!(host.item().map(|i| i.body()), Some("new reply".to_string()));
    }

    #[tokio::test]
    async fn prepend_keeps_previous_body() {
        let (_host, adapter) = compose_host("quoted original");
        adapter.write_body("My reply", WriteMode::Prepend).await.unwrap();
        let ctx = adapter.extract_context().await.unwrap();
        assert_eq!(ctx.body, format!("My reply{PREPEND_SEPARATOR}quoted original"));
    }

    #[tokio::test]
    async fn insert_at_cursor() {
        let (_host, adapter) = compose_host("quoted original");
        adapter
            .write_body("Inserted. ", WriteMode::InsertAtSelection)
            .await
            .unwrap();
        let ctx = adapter.extract_context().await.unwrap();
        assert_eq!(ctx.body, "Inserted. quoted original");
    }

    #[tokio::test]
    async fn read_mode_item_is_not_composable() {
        let host = Arc::new(MemoryMailHost::new(MemoryItem::message("S", "B")));
        let adapter = LiveMailAdapter::new(host.clone(), HostConfig::default());
        let err = adapter.write_body("x", WriteMode::Replace).await.unwrap_err();
        assert_eq!(err, HostError::NotComposable);
        assert_eq!(host.item().map(|i| i.write_count()), Some(0));
    }

    #[tokio::test]
    async fn appointment_is_not_composable() {
        let host = Arc::new(MemoryMailHost::new(
            MemoryItem::message("S", "B").in_compose_mode().as_appointment(),
        ));
        let adapter = LiveMailAdapter::new(host, HostConfig::default());
        let err = adapter.write_body("x", WriteMode::Replace).await.unwrap_err();
        assert_eq!(err, HostError::NotComposable);
    }

    #[tokio::test]
    async fn write_failure_without_message_gets_generic_text() {
        let (host, adapter) = compose_host("B");
        if let Some(item) = host.item() {
            item.fail_writes(Some(String::new()));
        }
        let err = adapter.write_body("x", WriteMode::Replace).await.unwrap_err();
        assert_eq!(
            err,
            HostError::Write {
                message: NO_HOST_MESSAGE.into()
            }
        );
    }

    #[tokio::test]
    async fn html_delivery_escapes() {
        let host = Arc::new(MemoryMailHost::new(
            MemoryItem::message("S", "").in_compose_mode(),
        ));
        let config = HostConfig {
            delivery_format: DeliveryFormat::Html,
            ..HostConfig::default()
        };
        let adapter = LiveMailAdapter::new(host.clone(), config);
        adapter.write_body("a<b\nc", WriteMode::Replace).await.unwrap();
        assert_eq!(host.item().map(|i| i.body()), Some("a&lt;b<br>c".to_string()));
    }

    #[tokio::test]
    async fn closed_item_reports_no_item() {
        let (host, adapter) = compose_host("B");
        host.clear();
        assert!(!adapter.is_host_available());
        let err = adapter.extract_context().await.unwrap_err();
        assert_eq!(err, HostError::NoItem);
    }
}
