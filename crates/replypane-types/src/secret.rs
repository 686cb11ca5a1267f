//! Credential wrapper that keeps API keys out of logs and config dumps.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A credential value (API key, bearer token) that must never be printed.
///
/// - `Debug` and `Display` print `[REDACTED]`, or nothing when empty
/// - `Serialize` always emits an empty string, so `replypane config`
///   can dump the resolved configuration safely
/// - `Deserialize` accepts a plain string
/// - [`expose()`](SecretString::expose) hands out the inner value for the
///   one place that needs it (the `Authorization` header)
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read a credential from the named environment variable.
    ///
    /// Returns `None` when the variable is unset or blank.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Self)
    }

    /// The raw credential value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `true` when no credential is held.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "\"\"")
        } else {
            write!(f, "\"[REDACTED]\"")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            Ok(())
        } else {
            write!(f, "[REDACTED]")
        }
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
