//! Mail host adapter for replypane.
//!
//! The hosting email client exposes its open item through a callback-based
//! API ([`MailboxItem`]). This crate hides that behind the async
//! [`MailContextAdapter`] contract so the workflow controller never deals
//! with callbacks or with the question of whether a host exists at all.
//!
//! # Architecture
//!
//! - [`MailHost`] / [`MailboxItem`] -- the raw host surface
//! - [`LiveMailAdapter`] -- bridges host callbacks to futures
//! - [`MockMailAdapter`] -- fixed context, no-op writes (no host present)
//! - [`select_adapter`] -- picks one of the two once, at startup
//! - [`EmlMailHost`] -- a host backed by an `.eml` file on disk
//! - [`MemoryMailHost`] -- an in-process host for embedding and tests

pub mod adapter;
pub mod eml;
pub mod error;
pub mod format;
pub mod item;
pub mod live;
pub mod memory;
pub mod mock;

pub use adapter::{MailContextAdapter, WriteMode, select_adapter};
pub use eml::EmlMailHost;
pub use error::{HostError, Result};
pub use item::{
    AsyncResult, AsyncStatus, Callback, CoercionType, ItemMode, ItemType, MailHost, MailboxItem,
};
pub use live::LiveMailAdapter;
pub use memory::{MemoryItem, MemoryMailHost};
pub use mock::{MockMailAdapter, mock_context};
