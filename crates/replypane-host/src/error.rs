//! Host adapter error types.

use thiserror::Error;

/// Errors raised while reading from or writing to the mail host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    /// The host failed to return the item body.
    #[error("failed to read message body: {message}")]
    Read {
        /// Host-supplied reason, or a generic one when the host gave none.
        message: String,
    },

    /// The host rejected a body write.
    #[error("failed to write message body: {message}")]
    Write {
        /// Host-supplied reason, or a generic one when the host gave none.
        message: String,
    },

    /// Writes are only legal on a message in compose mode.
    #[error("not in compose mode: the open item cannot be edited")]
    NotComposable,

    /// The host is present but has no open item.
    #[error("no mailbox item is open")]
    NoItem,

    /// A file-backed host could not be opened.
    #[error("failed to load mailbox item: {0}")]
    Load(String),

    /// A file-backed host could not save its body to disk.
    #[error("failed to save mailbox item: {0}")]
    Save(String),
}

/// Convenience alias for host adapter operations.
pub type Result<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_read() {
        let err = HostError::Read {
            message: "item was closed".into(),
        };
        assert_eq!(err.to_string(), "failed to read message body: item was closed");
    }

    #[test]
    fn display_write() {
        let err = HostError::Write {
            message: "quota".into(),
        };
        assert_eq!(err.to_string(), "failed to write message body: quota");
    }

    #[test]
    fn display_save() {
        let err = HostError::Save("out.txt: denied".into());
        assert_eq!(err.to_string(), "failed to save mailbox item: out.txt: denied");
    }

    #[test]
    fn display_not_composable() {
        assert_eq!(
            HostError::NotComposable.to_string(),
            "not in compose mode: the open item cannot be edited"
        );
    }
}
