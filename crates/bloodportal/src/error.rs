//! Error types for bloodportal.
//!
//! This module defines all error types used throughout the bloodportal crate.
//! The portal turns most of these into fixed user-facing messages; the
//! variants keep the detail for logs and exit codes.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for bloodportal operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Remote API Errors ===
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server rejected request to {url} with {status}: {body}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// The HTTP status returned.
        status: StatusCode,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// The URL that was requested.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured base URL is not usable.
    #[error("invalid API base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
        /// Description of what is wrong with it.
        message: String,
    },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    // === Form Errors ===
    /// A required form field was left empty.
    #[error("{form} form: {field} is required")]
    MissingField {
        /// Name of the form.
        form: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for bloodportal operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(form: &'static str, field: &'static str) -> Self {
        Self::MissingField { form, field }
    }

    /// Check if this error came from talking to the remote API.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Http { .. } | Self::Decode { .. }
        )
    }

    /// Check if this error is a form that was not submitted.
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// The HTTP status, when the server answered with one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
