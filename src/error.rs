//! Error types for the Blockchair dashboard

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for the Blockchair dashboard
pub type Result<T> = std::result::Result<T, Error>;

/// Blockchair dashboard errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, detected before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream rejected the credential (HTTP 402)
    #[error("Authorization error: upstream returned {status}")]
    Authorization {
        /// HTTP status returned by the upstream
        status: u16,
    },

    /// Any other upstream or network failure
    #[error("Transient error: {0}")]
    Transient(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error for the presentation layer
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Transient(_) | Self::Io(_) | Self::Internal(_) => ErrorKind::Transient,
        }
    }

    /// The credential is missing
    pub(crate) fn credential_missing() -> Self {
        Self::Config("credential missing".to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the credential in the query string.
        Self::Transient(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Transient(format!("malformed response: {err}"))
    }
}

/// The three failure classes the dashboard branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential missing
    Configuration,
    /// Credential rejected by the upstream
    Authorization,
    /// Everything else; worth retrying later
    Transient,
}

impl ErrorKind {
    /// Fixed user-facing message for this kind
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Configuration => {
                "Blockchair API key is missing. Please set BLOCKCHAIR_API_KEY in your environment or .env file."
            }
            Self::Authorization => {
                "Invalid or expired Blockchair API key. Please check the configured API key."
            }
            Self::Transient => "Failed to fetch data from Blockchair. Please try again later.",
        }
    }

    /// Stable identifier used in JSON error bodies
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authorization => "authorization",
            Self::Transient => "transient",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
