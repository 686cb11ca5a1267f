//! Workflow error types.

use replypane_host::HostError;
use replypane_llm::GenerationError;
use thiserror::Error;

/// Errors returned by [`ReplyWorkflow`](crate::ReplyWorkflow) operations.
///
/// Every one of these is also written to the activity log; none leaves the
/// workflow unusable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WorkflowError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Delivery was requested with an empty or whitespace-only draft.
    #[error("no reply text to insert")]
    EmptyDraft,

    /// Another analyze/generate/deliver call is still pending.
    #[error("{operation} rejected: another operation is in progress")]
    Busy { operation: &'static str },
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_display() {
        let err: WorkflowError = GenerationError::BackendHttp { status: 502 }.into();
        assert_eq!(err.to_string(), "API responded 502");

        let err: WorkflowError = HostError::NotComposable.into();
        assert_eq!(err.to_string(), HostError::NotComposable.to_string());
    }

    #[test]
    fn busy_names_operation() {
        let err = WorkflowError::Busy { operation: "generate" };
        assert_eq!(err.to_string(), "generate rejected: another operation is in progress");
    }
}
