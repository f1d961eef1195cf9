//! Credential handling.

pub mod credentials;

pub use credentials::{ApiCredentials, SecretString, OPENAI_API_KEY, TAVILY_API_KEY};
