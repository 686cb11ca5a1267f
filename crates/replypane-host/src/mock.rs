//! Stand-in adapter used when no host is present.

use async_trait::async_trait;
use replypane_types::{EmailContext, Mailbox};
use tracing::debug;

use crate::adapter::{MailContextAdapter, WriteMode};
use crate::error::Result;

/// The fixed context returned by [`MockMailAdapter`].
pub fn mock_context() -> EmailContext {
    EmailContext {
        subject: "Test Subject: Project Discussion".into(),
        body: "Hi,\n\n\
               I wanted to follow up on our discussion about the new project. \
               Could you send me the updated requirements and a rough timeline \
               by the end of the week? I've attached the current documents for \
               reference.\n\n\
               Best regards,\nJohn"
            .into(),
        sender: Mailbox::new("John Smith", "john.smith@example.com"),
        recipients: vec![Mailbox::new("Jane Doe", "jane.doe@example.com")],
        attachments: vec!["project_requirements.pdf".into(), "timeline.xlsx".into()],
        received_at: "2024-01-15T10:30:00+00:00".into(),
    }
}

/// Adapter returning [`mock_context`] and accepting every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockMailAdapter;

impl MockMailAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailContextAdapter for MockMailAdapter {
    fn is_host_available(&self) -> bool {
        false
    }

    async fn extract_context(&self) -> Result<EmailContext> {
        Ok(mock_context())
    }

    async fn write_body(&self, text: &str, mode: WriteMode) -> Result<()> {
        debug!(mode = %mode, chars = text.chars().count(), "mock adapter discarding write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_context() {
        let ctx = MockMailAdapter::new().extract_context().await.unwrap();
        assert_eq!(ctx.subject, "Test Subject: Project Discussion");
        assert_eq!(ctx.attachments, vec!["project_requirements.pdf", "timeline.xlsx"]);
        assert_eq!(ctx, mock_context());
    }

    #[tokio::test]
    async fn writes_are_accepted() {
        let adapter = MockMailAdapter::new();
        assert!(adapter.write_body("reply", WriteMode::Prepend).await.is_ok());
        assert!(!adapter.is_host_available());
    }
}
