//! The raw host surface.
//!
//! These traits mirror the callback-based item API of the hosting email
//! client. Metadata getters are synchronous; body operations report their
//! outcome by invoking a [`Callback`] exactly once, possibly from another
//! thread. Nothing here is async: [`LiveMailAdapter`](crate::LiveMailAdapter)
//! bridges callbacks into futures.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use replypane_types::Mailbox;

/// Kind of item open in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Message,
    Appointment,
}

/// Whether the item is being read or composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMode {
    Read,
    Compose,
}

/// Text format used for a body read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionType {
    Text,
    Html,
}

/// Outcome flag carried by every host callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncStatus {
    Succeeded,
    Failed,
}

/// Error detail attached to a failed host operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostErrorInfo {
    pub message: String,
}

/// Result object handed to a host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncResult<T> {
    pub status: AsyncStatus,
    pub value: Option<T>,
    pub error: Option<HostErrorInfo>,
}

impl<T> AsyncResult<T> {
    pub fn succeeded(value: T) -> Self {
        Self {
            status: AsyncStatus::Succeeded,
            value: Some(value),
            error: None,
        }
    }

    /// A failure; hosts do not always supply a message.
    pub fn failed(message: Option<String>) -> Self {
        Self {
            status: AsyncStatus::Failed,
            value: None,
            error: message.map(|message| HostErrorInfo { message }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AsyncStatus::Succeeded
    }
}

/// Completion callback for a host body operation.
pub type Callback<T> = Box<dyn FnOnce(AsyncResult<T>) + Send + 'static>;

/// The item currently open in the host.
pub trait MailboxItem: Send + Sync {
    fn subject(&self) -> String;

    fn item_type(&self) -> ItemType;

    fn mode(&self) -> ItemMode;

    /// Sender, if the host knows it.
    fn from(&self) -> Option<Mailbox>;

    fn to(&self) -> Vec<Mailbox>;

    /// Attachment file names, in host order.
    fn attachments(&self) -> Vec<String>;

    fn date_time_created(&self) -> Option<DateTime<Utc>>;

    fn body_get_async(&self, coercion: CoercionType, callback: Callback<String>);

    fn body_set_async(&self, data: String, coercion: CoercionType, callback: Callback<()>);

    fn body_prepend_async(&self, data: String, coercion: CoercionType, callback: Callback<()>);

    /// Replace the current selection, or insert at the cursor when nothing
    /// is selected.
    fn body_set_selected_data_async(
        &self,
        data: String,
        coercion: CoercionType,
        callback: Callback<()>,
    );

    /// Only messages in compose mode accept body writes.
    fn is_composable(&self) -> bool {
        self.item_type() == ItemType::Message && self.mode() == ItemMode::Compose
    }
}

/// Entry point into the hosting email client.
pub trait MailHost: Send + Sync {
    fn current_item(&self) -> Option<Arc<dyn MailboxItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_without_message() {
        let r: AsyncResult<String> = AsyncResult::failed(None);
        assert!(!r.is_success());
        assert!(r.value.is_none());
        assert!(r.error.is_none());
    }

    #[test]
    fn succeeded_result_carries_value() {
        let r = AsyncResult::succeeded("body".to_string());
        assert!(r.is_success());
        assert_eq!(r.value.as_deref(), Some("body"));
    }
}
