//! Configuration error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or parsing the configuration file.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON or does not match the schema.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/missing.json"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.json");
    }

    #[test]
    fn display_parse_includes_path() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ConfigError::Parse {
            path: PathBuf::from("/etc/replypane.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to parse config file /etc/replypane.json:"));
    }
}
