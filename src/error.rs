//! Error types and handling infrastructure for tetropad.
//!
//! The adapter itself is infallible by design: duplicate activations,
//! mismatched release sources, and unknown key codes are all absorbed rather
//! than surfaced. Errors only exist at the demo's terminal and channel
//! boundaries; this module provides the `thiserror` types for those plus the
//! crate-wide `Result` alias.

use thiserror::Error;

/// The main error type for tetropad operations.
#[derive(Error, Debug)]
pub enum TetropadError {
    /// Terminal setup/teardown or draw failures.
    #[error("Terminal operation failed: {message}")]
    TerminalError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A channel endpoint disappeared while the app was still running.
    #[error("Channel closed unexpectedly: {message}")]
    ChannelClosed { message: String },

    /// Invalid pad or repeat configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Generic error for cases not covered by specific variants.
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for tetropad operations.
pub type Result<T> = std::result::Result<T, TetropadError>;

impl TetropadError {
    /// Create a TerminalError from an io::Error with additional context
    pub fn terminal(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::TerminalError {
            message: message.into(),
            source,
        }
    }

    /// Create a ChannelClosed error with a descriptive message
    pub fn channel(message: impl Into<String>) -> Self {
        Self::ChannelClosed {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Automatic conversion from io::Error (terminal I/O is the only io surface)
impl From<std::io::Error> for TetropadError {
    fn from(err: std::io::Error) -> Self {
        Self::TerminalError {
            message: "Terminal IO failed".to_string(),
            source: err,
        }
    }
}
