// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for smile-redirect
//!
//! Only setup paths can fail: compiling configured patterns, reading config
//! and preference files, parsing replay input. The navigation decision path
//! never returns an error; it falls back to letting the request through.

use thiserror::Error;

/// Result type alias for smile-redirect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// A configured domain or exclusion pattern did not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A registration match pattern (`*://host/*`) could not be parsed
    #[error("Invalid match pattern '{pattern}': {reason}")]
    InvalidMatchPattern { pattern: String, reason: String },

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The event loop has shut down
    #[error("Event loop has been closed")]
    EventLoopClosed,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a pattern compilation error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a match pattern error
    pub fn invalid_match_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidMatchPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error came from a bad rule pattern
    pub fn is_pattern_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidPattern { .. } | Error::InvalidMatchPattern { .. }
        )
    }

    /// Get the offending pattern if available
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Error::InvalidPattern { pattern, .. } => Some(pattern),
            Error::InvalidMatchPattern { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add file path context to error
    fn with_path(self, path: &std::path::Path) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_path(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            match err {
                Error::Io(io) => Error::Io(std::io::Error::new(
                    io.kind(),
                    format!("{}: {}", path.display(), io),
                )),
                Error::Serialization(json) => {
                    Error::Config(format!("{}: {}", path.display(), json))
                }
                other => other,
            }
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}
