// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error hierarchy for the tag bridge.
//!
//! Protocol crates define their own detailed error enums and convert into
//! [`BridgeError`] at the crate boundary, giving hosts a single type to
//! handle.
//!
//! # Examples
//!
//! ```
//! use dabridge_core::error::BridgeError;
//!
//! let error = BridgeError::connection("DCOM session rejected");
//! assert!(error.is_retryable());
//! assert_eq!(error.error_type(), "connection");
//! ```

use thiserror::Error;

// =============================================================================
// BridgeError
// =============================================================================

/// The root error type for the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// Server connection failed or was lost.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A read from the server failed.
    #[error("Read failed for '{tag}': {message}")]
    Read {
        /// The tag that failed.
        tag: String,
        /// Error message.
        message: String,
    },

    /// A write to the server failed.
    #[error("Write failed for '{tag}': {message}")]
    Write {
        /// The tag that failed.
        tag: String,
        /// Error message.
        message: String,
    },

    /// Handing a changeset to the downstream sink failed.
    #[error("Delivery failed: {message}")]
    Delivery {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The endpoint is not connected.
    #[error("Endpoint is not connected")]
    NotConnected,
}

impl BridgeError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a connection error with a source.
    pub fn connection_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a read error.
    pub fn read(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Creates a delivery error.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a delivery error with a source.
    pub fn delivery_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Delivery {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if this error is retryable.
    ///
    /// Retryable errors are transient conditions that may succeed on a later
    /// attempt; configuration errors never are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::Connection { .. }
                | BridgeError::Delivery { .. }
                | BridgeError::NotConnected
        )
    }

    /// Returns the error type as a string for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            BridgeError::Configuration { .. } => "configuration",
            BridgeError::Connection { .. } => "connection",
            BridgeError::Read { .. } => "read",
            BridgeError::Write { .. } => "write",
            BridgeError::Delivery { .. } => "delivery",
            BridgeError::NotConnected => "not_connected",
        }
    }
}

/// A Result type with BridgeError.
pub type BridgeResult<T> = Result<T, BridgeError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(BridgeError::connection("refused").is_retryable());
        assert!(BridgeError::NotConnected.is_retryable());
        assert!(!BridgeError::configuration("bad path").is_retryable());
        assert!(!BridgeError::read("tag", "bad quality").is_retryable());
    }

    #[test]
    fn test_error_type() {
        assert_eq!(BridgeError::delivery("queue full").error_type(), "delivery");
        assert_eq!(BridgeError::write("t", "m").error_type(), "write");
    }

    #[test]
    fn test_source_chaining() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = BridgeError::connection_with("connect failed", io);

        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("connect failed"));
    }
}
