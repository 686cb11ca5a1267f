//! Reply generation for replypane.
//!
//! Sends an extracted email context (plus tone and optional intent) to a
//! text-generation backend and returns the reply text.
//!
//! # Architecture
//!
//! - [`ReplyBackend`] trait defines the generation interface
//! - [`HttpBackend`] posts to a user-supplied reply service
//! - [`ModelBackend`] calls an OpenAI-compatible chat completion endpoint
//! - [`MockBackend`] returns templated replies offline
//! - [`build_backend`] picks one from configuration at startup

pub mod backend;
pub mod error;
pub mod http;
pub mod mock;
pub mod model;
pub mod prompt;
pub mod types;

pub use backend::{ReplyBackend, build_backend};
pub use error::{GenerationError, Result};
pub use http::HttpBackend;
pub use mock::MockBackend;
pub use model::{FALLBACK_REPLY, ModelBackend};
