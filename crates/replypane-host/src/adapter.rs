//! The uniform async contract the workflow talks to.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use replypane_types::{EmailContext, config::HostConfig};
use tracing::info;

use crate::error::Result;
use crate::item::MailHost;
use crate::live::LiveMailAdapter;
use crate::mock::MockMailAdapter;

/// Where delivered text goes in the item body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Overwrite the whole body.
    #[default]
    Replace,
    /// Put the text (plus a separator) in front of the existing body.
    Prepend,
    /// Replace the selection, or insert at the cursor.
    InsertAtSelection,
}

impl WriteMode {
    /// Parse a CLI-style mode name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "replace" => Some(WriteMode::Replace),
            "prepend" => Some(WriteMode::Prepend),
            "insert" | "insert-at-selection" | "selection" => Some(WriteMode::InsertAtSelection),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Replace => "replace",
            WriteMode::Prepend => "prepend",
            WriteMode::InsertAtSelection => "insert",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the open item's context and writes replies back into it.
#[async_trait]
pub trait MailContextAdapter: Send + Sync {
    /// True only when a host is present and has an open item.
    fn is_host_available(&self) -> bool;

    /// Capture a snapshot of the open item. Suspends until the host's body
    /// read completes.
    async fn extract_context(&self) -> Result<EmailContext>;

    /// Write `text` into the item body. Fails with
    /// [`HostError::NotComposable`](crate::HostError::NotComposable) unless
    /// the item is a message being composed.
    async fn write_body(&self, text: &str, mode: WriteMode) -> Result<()>;
}

/// Pick the adapter implementation once, at startup.
///
/// A live adapter is used only when a host is given and it has an item
/// open; otherwise the mock adapter stands in.
pub fn select_adapter(
    host: Option<Arc<dyn MailHost>>,
    config: &HostConfig,
) -> Arc<dyn MailContextAdapter> {
    match host {
        Some(host) if host.current_item().is_some() => {
            info!("mail host detected, using live adapter");
            Arc::new(LiveMailAdapter::new(host, config.clone()))
        }
        Some(_) => {
            info!("mail host has no open item, using mock adapter");
            Arc::new(MockMailAdapter::new())
        }
        None => {
            info!("no mail host, using mock adapter");
            Arc::new(MockMailAdapter::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryItem, MemoryMailHost};

    #[test]
    fn write_mode_parse() {
        assert_eq!(WriteMode::parse("replace"), Some(WriteMode::Replace));
        assert_eq!(WriteMode::parse("Prepend"), Some(WriteMode::Prepend));
        assert_eq!(WriteMode::parse("insert"), Some(WriteMode::InsertAtSelection));
        assert_eq!(WriteMode::parse("append"), None);
    }

    #[test]
    fn no_host_selects_mock() {
        let adapter = select_adapter(None, &HostConfig::default());
        assert!(!adapter.is_host_available());
    }

    #[test]
    fn host_without_item_selects_mock() {
        let host: Arc<dyn MailHost> = Arc::new(MemoryMailHost::empty());
        let adapter = select_adapter(Some(host), &HostConfig::default());
        assert!(!adapter.is_host_available());
    }

    #[test]
    fn host_with_item_selects_live() {
        let host: Arc<dyn MailHost> =
            Arc::new(MemoryMailHost::new(MemoryItem::message("Hi", "Body")));
        let adapter = select_adapter(Some(host), &HostConfig::default());
        assert!(adapter.is_host_available());
    }
}
