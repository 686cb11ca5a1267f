//! Workflow controller for replypane.
//!
//! [`ReplyWorkflow`] runs extract → generate → present → deliver against a
//! [`MailContextAdapter`](replypane_host::MailContextAdapter) and a
//! [`ReplyBackend`](replypane_llm::ReplyBackend), recording every step in an
//! [`ActivityLog`].

pub mod activity_log;
pub mod error;
pub mod workflow;

pub use activity_log::{ActivityLog, LogEntry};
pub use error::{Result, WorkflowError};
pub use workflow::{Phase, ReplyWorkflow};
