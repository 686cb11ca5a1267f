//! Built-in panel commands.
//!
//! Workflow failures are already in the activity log, so commands driving
//! the workflow print the log lines they produced instead of returning
//! errors. Errors are reserved for bad usage.

use std::path::Path;

use async_trait::async_trait;
use replypane_host::WriteMode;
use replypane_types::Tone;

use super::registry::{CommandOutput, PanelContext, SlashCommand, SlashCommandRegistry};

/// Register every built-in command.
pub fn register_builtins(registry: &mut SlashCommandRegistry) {
    registry.register(Box::new(AnalyzeCommand));
    registry.register(Box::new(GenerateCommand));
    registry.register(Box::new(ToneCommand));
    registry.register(Box::new(EditCommand));
    registry.register(Box::new(ShowCommand));
    registry.register(Box::new(DeliverCommand));
    registry.register(Box::new(LogCommand));
    registry.register(Box::new(StatusCommand));
    registry.register(Box::new(SaveCommand));
    registry.register(Box::new(QuitCommand));
}

// ── /analyze ──────────────────────────────────────────────────────────────

struct AnalyzeCommand;

#[async_trait]
impl SlashCommand for AnalyzeCommand {
    fn name(&self) -> &str {
        "analyze"
    }

    fn description(&self) -> &str {
        "Read the open email"
    }

    async fn execute(&self, _args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        let before = ctx.workflow.log().len();
        let mut out = String::new();
        if let Ok(email) = ctx.workflow.analyze().await {
            out.push_str(&format!("Subject:     {}\n", email.subject));
            out.push_str(&format!("From:        {}\n", email.sender));
            out.push_str(&format!("To:          {}\n", email.recipient_list()));
            out.push_str(&format!("Received:    {}\n", email.received_at));
            out.push_str(&format!("Attachments: {}\n\n", email.attachments.join(", ")));
        }
        out.push_str(&ctx.log_since(before));
        Ok(out.into())
    }
}

// ── /generate ─────────────────────────────────────────────────────────────

struct GenerateCommand;

#[async_trait]
impl SlashCommand for GenerateCommand {
    fn name(&self) -> &str {
        "generate"
    }

    fn usage(&self) -> &str {
        "[intent]"
    }

    fn description(&self) -> &str {
        "Generate a reply, optionally saying what it should say"
    }

    async fn execute(&self, args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        let before = ctx.workflow.log().len();
        let intent = Some(args.to_owned());
        let mut out = String::new();
        if let Ok(draft) = ctx.workflow.generate(intent, ctx.tone).await {
            out.push_str(&draft);
            out.push_str("\n\n");
        }
        out.push_str(&ctx.log_since(before));
        Ok(out.into())
    }
}

// ── /tone ─────────────────────────────────────────────────────────────────

struct ToneCommand;

#[async_trait]
impl SlashCommand for ToneCommand {
    fn name(&self) -> &str {
        "tone"
    }

    fn usage(&self) -> &str {
        "[formal|informal|direct]"
    }

    fn description(&self) -> &str {
        "Show or set the reply tone"
    }

    async fn execute(&self, args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        if args.is_empty() {
            let all: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();
            return Ok(format!("Tone: {} (options: {})", ctx.tone, all.join(", ")).into());
        }
        ctx.tone = Tone::parse(args);
        Ok(format!("Tone set to {}", ctx.tone).into())
    }
}

// ── /edit ─────────────────────────────────────────────────────────────────

struct EditCommand;

#[async_trait]
impl SlashCommand for EditCommand {
    fn name(&self) -> &str {
        "edit"
    }

    fn usage(&self) -> &str {
        "<text>"
    }

    fn description(&self) -> &str {
        "Replace the draft (\\n starts a new line)"
    }

    async fn execute(&self, args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        if args.is_empty() {
            anyhow::bail!("usage: /edit <text>");
        }
        ctx.workflow.edit_draft(args.replace("\\n", "\n"));
        Ok("Draft updated.".into())
    }
}

// ── /show ─────────────────────────────────────────────────────────────────

struct ShowCommand;

#[async_trait]
impl SlashCommand for ShowCommand {
    fn name(&self) -> &str {
        "show"
    }

    fn description(&self) -> &str {
        "Show the current draft"
    }

    async fn execute(&self, _args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        let draft = ctx.workflow.draft();
        if draft.is_empty() {
            Ok("(empty draft)".into())
        } else {
            Ok(draft.into())
        }
    }
}

// ── /deliver ──────────────────────────────────────────────────────────────

struct DeliverCommand;

#[async_trait]
impl SlashCommand for DeliverCommand {
    fn name(&self) -> &str {
        "deliver"
    }

    fn usage(&self) -> &str {
        "[replace|prepend|insert]"
    }

    fn description(&self) -> &str {
        "Write the draft into the open item"
    }

    async fn execute(&self, args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        let mode = if args.is_empty() {
            WriteMode::default()
        } else {
            WriteMode::parse(args).ok_or_else(|| {
                anyhow::anyhow!("unknown mode '{args}' (expected replace, prepend or insert)")
            })?
        };
        let before = ctx.workflow.log().len();
        // Outcome is in the log either way.
        let _ = ctx.workflow.deliver(mode).await;
        Ok(ctx.log_since(before).into())
    }
}

// ── /log ──────────────────────────────────────────────────────────────────

struct LogCommand;

#[async_trait]
impl SlashCommand for LogCommand {
    fn name(&self) -> &str {
        "log"
    }

    fn description(&self) -> &str {
        "Show the activity log"
    }

    async fn execute(&self, _args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        let rendered = ctx.workflow.log().render();
        if rendered.is_empty() {
            Ok("(no activity yet)".into())
        } else {
            Ok(rendered.trim_end().into())
        }
    }
}

// ── /status ───────────────────────────────────────────────────────────────

struct StatusCommand;

#[async_trait]
impl SlashCommand for StatusCommand {
    fn name(&self) -> &str {
        "status"
    }

    fn description(&self) -> &str {
        "Show phase, backend, host and tone"
    }

    async fn execute(&self, _args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        let wf = &ctx.workflow;
        let host = if wf.host_available() {
            "live"
        } else {
            "mock (no mailbox item)"
        };
        let subject = wf
            .context()
            .map(|c| c.subject)
            .unwrap_or_else(|| "(not analyzed)".into());
        let lines = [
            format!("Phase:   {}", wf.phase()),
            format!("Backend: {}", wf.backend_name()),
            format!("Host:    {host}"),
            format!("Tone:    {}", ctx.tone),
            format!("Email:   {subject}"),
            format!("Draft:   {} chars", wf.draft().chars().count()),
        ];
        Ok(lines.join("\n").into())
    }
}

// ── /save ─────────────────────────────────────────────────────────────────

struct SaveCommand;

#[async_trait]
impl SlashCommand for SaveCommand {
    fn name(&self) -> &str {
        "save"
    }

    fn usage(&self) -> &str {
        "<path>"
    }

    fn description(&self) -> &str {
        "Save the item body to a file"
    }

    async fn execute(&self, args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        if args.is_empty() {
            anyhow::bail!("usage: /save <path>");
        }
        let eml = ctx
            .eml
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no mailbox item file open (start with --item)"))?;
        let path = Path::new(args);
        eml.save_body(path)?;
        Ok(format!("Saved item body to {}", path.display()).into())
    }
}

// ── /quit ─────────────────────────────────────────────────────────────────

struct QuitCommand;

#[async_trait]
impl SlashCommand for QuitCommand {
    fn name(&self) -> &str {
        "quit"
    }

    fn description(&self) -> &str {
        "Leave the panel"
    }

    async fn execute(&self, _args: &str, _ctx: &mut PanelContext) -> anyhow::Result<CommandOutput> {
        Ok(CommandOutput::Quit)
    }
}
