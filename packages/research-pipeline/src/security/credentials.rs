//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of API keys.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable holding the search provider key.
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";

/// Environment variable holding the scorer key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use in a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Keys for the search provider and the relevance scorer.
#[derive(Clone)]
pub struct ApiCredentials {
    /// Search provider key.
    pub tavily_api_key: SecretString,

    /// Scorer key. Only required when AI filtering is on.
    pub openai_api_key: Option<SecretString>,
}

impl ApiCredentials {
    /// Read keys from the environment.
    ///
    /// The search key is always required; the scorer key only when
    /// `require_scorer` is set. Empty values count as missing.
    pub fn from_env(require_scorer: bool) -> ConfigResult<Self> {
        Self::from_lookup(require_scorer, |name| std::env::var(name).ok())
    }

    /// Read keys through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(
        require_scorer: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let tavily = get(TAVILY_API_KEY);
        if tavily.is_none() {
            missing.push(TAVILY_API_KEY);
        }
        let openai = get(OPENAI_API_KEY);
        if require_scorer && openai.is_none() {
            missing.push(OPENAI_API_KEY);
        }

        match tavily {
            Some(tavily) if missing.is_empty() => Ok(Self {
                tavily_api_key: SecretString::new(tavily),
                openai_api_key: openai.map(SecretString::new),
            }),
            _ => Err(ConfigError::MissingCredential(missing.join(", "))),
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("tavily_api_key", &"[REDACTED]")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
