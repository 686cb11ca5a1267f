//! Slash command registry and dispatch.
//!
//! The [`SlashCommandRegistry`] holds a set of named [`SlashCommand`]
//! implementations and dispatches user input that starts with `/` to the
//! matching handler.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = SlashCommandRegistry::new();
//! registry.register(Box::new(HelpCommand));
//! let result = registry.dispatch("/help", &mut ctx).await;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use replypane_core::ReplyWorkflow;
use replypane_host::EmlMailHost;
use replypane_types::Tone;

/// Mutable panel state passed to slash commands.
pub struct PanelContext {
    pub workflow: Arc<ReplyWorkflow>,

    /// Tone used by `/generate`.
    pub tone: Tone,

    /// The file-backed host, when the panel was opened with `--item`.
    pub eml: Option<Arc<EmlMailHost>>,
}

impl PanelContext {
    pub fn new(workflow: Arc<ReplyWorkflow>, tone: Tone) -> Self {
        Self {
            workflow,
            tone,
            eml: None,
        }
    }

    /// Log lines appended since the log held `since` entries.
    pub fn log_since(&self, since: usize) -> String {
        self.workflow
            .log_entries()
            .iter()
            .skip(since)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What the REPL does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Print this text and keep reading.
    Text(String),
    /// Leave the panel.
    Quit,
}

impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        CommandOutput::Text(text)
    }
}

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        CommandOutput::Text(text.to_owned())
    }
}

/// A slash command handler.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Command name without the leading `/`.
    fn name(&self) -> &str;

    /// Argument synopsis for help text (e.g. `"<tone>"`), empty if none.
    fn usage(&self) -> &str {
        ""
    }

    /// One-line description for help text.
    fn description(&self) -> &str;

    async fn execute(&self, args: &str, ctx: &mut PanelContext) -> anyhow::Result<CommandOutput>;
}

/// Registry of slash commands with dispatch.
pub struct SlashCommandRegistry {
    commands: HashMap<String, Box<dyn SlashCommand>>,
}

impl SlashCommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a slash command, replacing any with the same name.
    pub fn register(&mut self, cmd: Box<dyn SlashCommand>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Dispatch a line of input.
    ///
    /// The input should start with `/`. The first word (after `/`) is the
    /// command name, and the rest is passed as `args`.
    ///
    /// Returns `None` for input that is not a slash command or names an
    /// unregistered command.
    pub async fn dispatch(
        &self,
        input: &str,
        ctx: &mut PanelContext,
    ) -> Option<anyhow::Result<CommandOutput>> {
        let without_slash = input.trim().strip_prefix('/')?;
        let (name, args) = match without_slash.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (without_slash, ""),
        };

        let cmd = self.commands.get(name)?;
        Some(cmd.execute(args, ctx).await)
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All registered command names (sorted).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Help text listing every command, sorted by name.
    pub fn help_text(&self) -> String {
        let mut out = String::from("Commands:\n");
        for name in self.names() {
            if let Some(cmd) = self.commands.get(name) {
                let synopsis = format!("/{name} {}", cmd.usage());
                out.push_str(&format!("  {:<22} {}\n", synopsis.trim_end(), cmd.description()));
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for SlashCommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replypane_host::MockMailAdapter;
    use replypane_llm::MockBackend;

    /// A test command that echoes its arguments.
    struct EchoCommand;

    #[async_trait]
    impl SlashCommand for EchoCommand {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo arguments back"
        }
        async fn execute(
            &self,
            args: &str,
            _ctx: &mut PanelContext,
        ) -> anyhow::Result<CommandOutput> {
            Ok(format!("echo: {args}").into())
        }
    }

    /// A test command that returns an error.
    struct FailCommand;

    #[async_trait]
    impl SlashCommand for FailCommand {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        async fn execute(
            &self,
            _args: &str,
            _ctx: &mut PanelContext,
        ) -> anyhow::Result<CommandOutput> {
            anyhow::bail!("intentional failure")
        }
    }

    fn test_ctx() -> PanelContext {
        let wf = ReplyWorkflow::new(Arc::new(MockMailAdapter::new()), Arc::new(MockBackend::new()));
        PanelContext::new(Arc::new(wf), Tone::Formal)
    }

    fn test_registry() -> SlashCommandRegistry {
        let mut reg = SlashCommandRegistry::new();
        reg.register(Box::new(EchoCommand));
        reg.register(Box::new(FailCommand));
        reg
    }

    #[tokio::test]
    async fn dispatch_passes_trimmed_args() {
        let reg = test_registry();
        let mut ctx = test_ctx();
        let out = reg.dispatch("  /echo   hello world  ", &mut ctx).await.unwrap().unwrap();
        assert_eq!(out, CommandOutput::Text("echo: hello world".into()));
    }

    #[tokio::test]
    async fn dispatch_without_args() {
        let reg = test_registry();
        let mut ctx = test_ctx();
        let out = reg.dispatch("/echo", &mut ctx).await.unwrap().unwrap();
        assert_eq!(out, CommandOutput::Text("echo: ".into()));
    }

    #[tokio::test]
    async fn dispatch_unknown_and_plain_text() {
        let reg = test_registry();
        let mut ctx = test_ctx();
        assert!(reg.dispatch("/nope", &mut ctx).await.is_none());
        assert!(reg.dispatch("echo hi", &mut ctx).await.is_none());
    }

    #[tokio::test]
    async fn dispatch_error_propagates() {
        let reg = test_registry();
        let mut ctx = test_ctx();
        let err = reg.dispatch("/fail", &mut ctx).await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "intentional failure");
    }

    #[test]
    fn names_sorted_and_help_lists_all() {
        let reg = test_registry();
        assert_eq!(reg.names(), vec!["echo", "fail"]);
        assert_eq!(reg.len(), 2);
        assert!(reg.has("echo"));
        let help = reg.help_text();
        assert!(help.contains("/echo"));
        assert!(help.contains("Always fails"));
    }

    #[tokio::test]
    async fn log_since_returns_new_entries() {
        let ctx = test_ctx();
        ctx.workflow.log().append("old");
        let before = ctx.workflow.log().len();
        ctx.workflow.log().append("new");
        let text = ctx.log_since(before);
        assert!(text.ends_with("] new"));
        assert!(!text.contains("old"));
    }
}
