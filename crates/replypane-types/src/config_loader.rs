//! Configuration file discovery and loading.
//!
//! Lookup order:
//! 1. An explicit path (the CLI `--config` flag). Must exist.
//! 2. The `REPLYPANE_CONFIG` environment variable.
//! 3. `~/.replypane/config.json`
//!
//! A discovered path that does not exist yields the default config. Keys
//! may be written in camelCase (as the panel's settings export does) or
//! snake_case; they are normalized to snake_case before deserializing.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::ReplyConfig;
use crate::error::ConfigError;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "REPLYPANE_CONFIG";

/// Pick the config path from the env override or the home directory.
///
/// `env_override` is the value of [`CONFIG_ENV_VAR`], passed in so callers
/// (and tests) control the environment.
pub fn discover_config_path(
    env_override: Option<String>,
    home_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(raw) = env_override.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(raw));
    }
    home_dir.map(|home| home.join(".replypane").join("config.json"))
}

/// Load the configuration, honouring an explicit path override.
pub fn load_config(path_override: Option<&Path>) -> Result<ReplyConfig, ConfigError> {
    if let Some(path) = path_override {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return load_from_path(path);
    }

    let discovered = discover_config_path(std::env::var(CONFIG_ENV_VAR).ok(), dirs::home_dir());
    match discovered {
        Some(path) if path.exists() => load_from_path(&path),
        Some(path) => {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(ReplyConfig::default())
        }
        None => {
            info!("no home directory, using default config");
            Ok(ReplyConfig::default())
        }
    }
}

/// Read and parse one config file.
pub fn load_from_path(path: &Path) -> Result<ReplyConfig, ConfigError> {
    debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse config JSON text, normalizing keys first.
pub fn parse_config(contents: &str) -> Result<ReplyConfig, serde_json::Error> {
    let raw: Value = serde_json::from_str(contents)?;
    serde_json::from_value(normalize_keys(raw))
}

/// Rewrite every object key from camelCase to snake_case, recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), normalize_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert one camelCase identifier to snake_case.
///
/// An uppercase run stays together ("maxHTMLChars" -> "max_html_chars").
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}
