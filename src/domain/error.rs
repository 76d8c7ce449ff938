use serde::Serialize;
use thiserror::Error;

/// Domain-level errors for BrailleTalk.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Missing credential: {0} is not set in the environment")]
    MissingCredential(String),

    #[error("Speech recognition error: {0}")]
    Speech(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Speech recognition is not supported in this environment")]
    Unsupported,
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

/// Error surfaced to the presentation layer for the current cycle.
///
/// At most one is active at a time; a new recording attempt clears it.
/// Mutually exclusive with a `TranslationResult` within a cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum SessionError {
    /// No speech capability is available in this environment.
    #[error("Speech recognition is not supported in this environment")]
    Unsupported,

    /// The speech provider reported a mid-session failure.
    #[error("Speech Recognition Error: {0}")]
    Speech(String),

    /// The translation call failed or returned unusable data.
    #[error("Translation Error: {0}")]
    Translation(String),
}
