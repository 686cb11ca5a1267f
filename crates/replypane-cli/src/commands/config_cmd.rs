//! `replypane config` -- display resolved configuration.
//!
//! Shows the full resolved configuration as formatted JSON, or one section
//! by name. Credentials serialize as empty strings.
//!
//! # Examples
//!
//! ```text
//! replypane config
//! replypane config --section backend
//! ```

use clap::Args;
use replypane_types::ReplyConfig;

use super::load_config;

/// Arguments for the `config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Only show this section (backend, host, defaults).
    #[arg(long)]
    pub section: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let text = match args.section.as_deref() {
        Some(section) => render_section(&config, section)?,
        None => render_config(&config)?,
    };
    println!("{text}");
    Ok(())
}

/// The resolved configuration as pretty JSON.
pub fn render_config(config: &ReplyConfig) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// One configuration section as pretty JSON.
pub fn render_section(config: &ReplyConfig, section: &str) -> anyhow::Result<String> {
    let value = serde_json::to_value(config)?;
    match value.get(section) {
        Some(v) => Ok(serde_json::to_string_pretty(v)?),
        None => {
            let available: Vec<&str> = value
                .as_object()
                .map(|m| m.keys().map(|k| k.as_str()).collect())
                .unwrap_or_default();
            anyhow::bail!(
                "unknown section '{section}' (available: {})",
                available.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replypane_types::SecretString;

    #[test]
    fn render_default_config() {
        let json = render_config(&ReplyConfig::default()).unwrap();
        assert!(json.contains("\"mode\": \"mock\""));
        assert!(json.contains("\"max_body_chars\": 5000"));
    }

    #[test]
    fn api_key_is_blanked() {
        let mut config = ReplyConfig::default();
        config.backend.model.api_key = SecretString::new("sk-live-123");
        let json = render_config(&config).unwrap();
        assert!(!json.contains("sk-live-123"));
    }

    #[test]
    fn section_valid() {
        let json = render_section(&ReplyConfig::default(), "defaults").unwrap();
        assert!(json.contains("\"tone\": \"formal\""));
    }

    #[test]
    fn section_invalid_lists_available() {
        let err = render_section(&ReplyConfig::default(), "nonexistent").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown section 'nonexistent'"));
        assert!(msg.contains("backend"));
    }
}
