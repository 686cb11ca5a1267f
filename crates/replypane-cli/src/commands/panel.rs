//! `replypane panel` -- interactive reply panel.
//!
//! Reads slash commands from stdin and drives one workflow session.
//!
//! # Examples
//!
//! ```text
//! replypane panel --item drafts/re-offsite.eml
//! > /generate accept and suggest Thursday
//! > /deliver prepend
//! > /quit
//! ```

use clap::Args;
use replypane_types::Tone;
use tokio::io::AsyncBufReadExt;
use tracing::debug;

use super::{HostArgs, build_session, load_config};
use crate::panel::builtins::register_builtins;
use crate::panel::{CommandOutput, PanelContext, SlashCommandRegistry};

/// Arguments for the `panel` subcommand.
#[derive(Args, Debug)]
pub struct PanelArgs {
    #[command(flatten)]
    pub host: HostArgs,

    /// Initial reply tone. Defaults to the configured tone.
    #[arg(long)]
    pub tone: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

pub async fn run(args: PanelArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let session = build_session(&config, &args.host)?;

    let tone = args
        .tone
        .as_deref()
        .map(Tone::parse)
        .unwrap_or(config.defaults.tone);
    let mut ctx = PanelContext::new(session.workflow, tone);
    ctx.eml = session.eml;

    let mut registry = SlashCommandRegistry::new();
    register_builtins(&mut registry);

    print_banner(&ctx);

    let stdin = tokio::io::stdin();
    let mut reader = tokio::io::BufReader::new(stdin).lines();

    loop {
        eprint!("> ");
        use std::io::Write;
        std::io::stderr().flush().ok();

        let line = match reader.next_line().await? {
            Some(l) => l,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/exit" => break,
            "/help" => {
                print!("{}", registry.help_text());
                println!("  {:<22} Show this help", "/help");
                continue;
            }
            _ => {}
        }

        if !input.starts_with('/') {
            println!("Commands start with '/'. Try /generate or /help.");
            continue;
        }

        debug!(input, "panel command");
        match registry.dispatch(input, &mut ctx).await {
            Some(Ok(CommandOutput::Quit)) => break,
            Some(Ok(CommandOutput::Text(text))) => {
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            Some(Err(e)) => eprintln!("error: {e}"),
            None => println!("unknown command: {input} (try /help)"),
        }
    }

    Ok(())
}

fn print_banner(ctx: &PanelContext) {
    let wf = &ctx.workflow;
    let host = if wf.host_available() {
        "mailbox item"
    } else {
        "mock email (testing mode)"
    };
    println!("replypane panel");
    println!("  host:    {host}");
    println!("  backend: {}", wf.backend_name());
    println!("  tone:    {}", ctx.tone);
    println!("Type /help for commands, /quit to leave.");
    println!();
}
