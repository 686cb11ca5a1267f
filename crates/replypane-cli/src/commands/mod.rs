//! CLI command implementations for `replypane`.
//!
//! - [`run`] -- one-shot analyze, generate and optional delivery
//! - [`panel`] -- interactive panel REPL
//! - [`config_cmd`] -- resolved configuration dump

pub mod config_cmd;
pub mod panel;
pub mod run;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, ValueEnum};
use replypane_core::ReplyWorkflow;
use replypane_host::{EmlMailHost, MailHost, WriteMode, select_adapter};
use replypane_llm::build_backend;
use replypane_types::ReplyConfig;
use replypane_types::config_loader;

/// Mail host selection shared by `run` and `panel`.
#[derive(Args, Debug, Clone, Default)]
pub struct HostArgs {
    /// Open this `.eml` file as the current mailbox item. Without it no
    /// host is present and mock email data is used.
    #[arg(long, value_name = "FILE")]
    pub item: Option<PathBuf>,

    /// Treat the item as a draft being composed, even without `X-Unsent: 1`.
    #[arg(long, requires = "item")]
    pub compose: bool,
}

/// Delivery modes accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverMode {
    Replace,
    Prepend,
    Insert,
}

impl From<DeliverMode> for WriteMode {
    fn from(mode: DeliverMode) -> Self {
        match mode {
            DeliverMode::Replace => WriteMode::Replace,
            DeliverMode::Prepend => WriteMode::Prepend,
            DeliverMode::Insert => WriteMode::InsertAtSelection,
        }
    }
}

/// Load configuration from the given path override or via auto-discovery.
///
/// Discovery order: `--config`, then `REPLYPANE_CONFIG`, then
/// `~/.replypane/config.json`. A missing discovered file yields defaults;
/// a missing explicit path is an error.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<ReplyConfig> {
    let config = config_loader::load_config(config_override.map(Path::new))?;
    Ok(config)
}

/// Everything a panel session needs.
pub struct Session {
    pub workflow: Arc<ReplyWorkflow>,
    /// The file-backed host, when `--item` was given.
    pub eml: Option<Arc<EmlMailHost>>,
}

/// Wire host adapter, backend and workflow together.
pub fn build_session(config: &ReplyConfig, host: &HostArgs) -> anyhow::Result<Session> {
    let eml = match &host.item {
        Some(path) => Some(Arc::new(EmlMailHost::open(path, host.compose)?)),
        None => None,
    };

    let mail_host = eml.clone().map(|h| h as Arc<dyn MailHost>);
    let adapter = select_adapter(mail_host, &config.host);
    let backend = build_backend(&config.backend)?;

    Ok(Session {
        workflow: Arc::new(ReplyWorkflow::new(adapter, backend)),
        eml,
    })
}
