//! `replypane run` -- one-shot reply generation.
//!
//! Analyzes the current item, generates a reply, optionally delivers it,
//! then prints the draft followed by the activity log.
//!
//! # Examples
//!
//! ```text
//! replypane run
//! replypane run --item inbox/offsite.eml --tone friendly --intent "accept"
//! replypane run --item drafts/re-offsite.eml --deliver prepend --save out.txt
//! ```

use std::path::PathBuf;

use clap::Args;
use replypane_types::Tone;
use tracing::debug;

use super::{DeliverMode, HostArgs, build_session, load_config};

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub host: HostArgs,

    /// Reply tone (formal, informal, direct). Defaults to the configured tone.
    #[arg(long)]
    pub tone: Option<String>,

    /// What the reply should say, in free text.
    #[arg(long)]
    pub intent: Option<String>,

    /// Write the reply into the item after generating it.
    #[arg(long, value_enum)]
    pub deliver: Option<DeliverMode>,

    /// Save the item body to this file after delivery (requires --item).
    #[arg(long, value_name = "PATH", requires = "item")]
    pub save: Option<PathBuf>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the one-shot flow.
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let session = build_session(&config, &args.host)?;
    let workflow = &session.workflow;

    let tone = args
        .tone
        .as_deref()
        .map(Tone::parse)
        .unwrap_or(config.defaults.tone);
    debug!(%tone, backend = workflow.backend_name(), "starting one-shot run");

    // Failures are recorded in the activity log printed below.
    let generated = workflow.generate(args.intent, tone).await.is_ok();

    let delivered = match args.deliver {
        Some(mode) if generated => workflow.deliver(mode.into()).await.is_ok(),
        _ => true,
    };

    if let (Some(path), Some(eml)) = (&args.save, &session.eml) {
        eml.save_body(path)?;
        println!("Saved item body to {}", path.display());
    }

    if generated {
        println!("{}", workflow.draft());
        println!();
    }
    println!("Activity:");
    print!("{}", workflow.log().render());

    if !generated {
        anyhow::bail!("reply generation failed");
    }
    if !delivered {
        anyhow::bail!("reply delivery failed");
    }
    Ok(())
}
