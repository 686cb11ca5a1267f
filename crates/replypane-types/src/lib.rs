//! # replypane-types
//!
//! Core type definitions shared by every replypane crate.
//!
//! - **[`email`]** -- [`EmailContext`], [`Mailbox`], [`Tone`] and
//!   [`GenerationRequest`]
//! - **[`config`]** -- configuration schema (backend mode, host options)
//! - **[`config_loader`]** -- config file discovery and key normalization
//! - **[`secret`]** -- [`SecretString`] for credentials
//! - **[`error`]** -- [`ConfigError`]

pub mod config;
pub mod config_loader;
pub mod email;
pub mod error;
pub mod secret;

pub use config::{BackendMode, DeliveryFormat, PayloadContract, ReplyConfig};
pub use email::{EmailContext, GenerationRequest, Mailbox, Tone};
pub use error::ConfigError;
pub use secret::SecretString;
