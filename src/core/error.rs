use std::io;
use std::time::Duration;
use thiserror::Error;

/// Custom error types for the FBP client
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No reply within {waited:?}")]
    InvocationTimeout {
        /// Total wall-clock time spent waiting before giving up
        waited: Duration,
    },

    #[error("Invocation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Error::Encoding(msg.into())
    }

    /// Creates a new decoding error
    pub fn decoding(msg: impl Into<String>) -> Self {
        Error::Decoding(msg.into())
    }

    /// Creates a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns true if this is the normal "no answer" outcome of an
    /// at-most-once invocation rather than a hard failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::InvocationTimeout { .. })
    }
}
