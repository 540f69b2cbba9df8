// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC-DA error types.
//!
//! All operations in this crate return [`DaError`]. It converts into
//! `dabridge_core::BridgeError` at the crate boundary so hosts can handle a
//! single error type.
//!
//! # Examples
//!
//! ```
//! use dabridge_opcda::error::DaError;
//!
//! let error = DaError::read_failed("Plant/Line1/Temperature", "bad quality");
//! assert!(error.is_retryable());
//! assert_eq!(error.error_type(), "read_failed");
//! ```

use dabridge_core::BridgeError;
use thiserror::Error;

// =============================================================================
// DaError
// =============================================================================

/// Errors raised by the OPC-DA endpoint, codec, and engines.
#[derive(Debug, Error)]
pub enum DaError {
    /// Server connection failed or was lost.
    #[error("Connection failed: {message}")]
    Connection {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Neither (or both of) the server class ID and program ID were configured.
    #[error("Exactly one of clsId or progId must be set")]
    MissingServerIdentity,

    /// The configured class ID is not a valid GUID.
    #[error("Invalid clsId '{value}': not a valid GUID")]
    InvalidClsId {
        /// The rejected value.
        value: String,
    },

    /// The endpoint is not connected.
    #[error("Endpoint is not connected")]
    NotConnected,

    /// A path segment did not match any child in the server namespace.
    #[error("Unable to resolve path segment '{segment}'. Known children:\n{candidates}")]
    PathSegmentNotFound {
        /// The segment that failed to match.
        segment: String,
        /// One child per line, branches (`[B]`) before leaves (`[T]`).
        candidates: String,
    },

    /// Registering an item with the server group failed.
    #[error("Failed to register tag '{item_id}'")]
    TagRegistrationFailed {
        /// The item that could not be registered.
        item_id: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading an item failed.
    #[error("Read failed for '{item_id}': {message}")]
    ReadFailed {
        /// The item that failed.
        item_id: String,
        /// Error message.
        message: String,
    },

    /// Writing an item failed.
    #[error("Write failed for '{item_id}': {message}")]
    WriteFailed {
        /// The item that failed.
        item_id: String,
        /// Error message.
        message: String,
    },

    /// A value of this type cannot be encoded for the wire.
    #[error("Unsupported value type for write: {type_name}")]
    UnsupportedValueType {
        /// Name of the offending type.
        type_name: String,
    },

    /// A write addressed a tag that is not registered.
    #[error("Tag '{tag}' not found")]
    UnknownTag {
        /// The unregistered tag.
        tag: String,
    },

    /// The downstream sink rejected a changeset.
    #[error("Changeset delivery failed")]
    Delivery {
        /// The sink error.
        #[source]
        source: BridgeError,
    },
}

impl DaError {
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

    /// Creates an invalid class ID error.
    pub fn invalid_cls_id(value: impl Into<String>) -> Self {
        Self::InvalidClsId {
            value: value.into(),
        }
    }

    /// Creates a path-segment-not-found error.
    pub fn path_not_found(segment: impl Into<String>, candidates: impl Into<String>) -> Self {
        Self::PathSegmentNotFound {
            segment: segment.into(),
            candidates: candidates.into(),
        }
    }

    /// Creates a tag registration error.
    pub fn registration_failed<E>(item_id: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TagRegistrationFailed {
            item_id: item_id.into(),
            source: Box::new(source),
        }
    }

    /// Creates a read error.
    pub fn read_failed(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            item_id: item_id.into(),
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write_failed(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            item_id: item_id.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported value type error.
    pub fn unsupported_value_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedValueType {
            type_name: type_name.into(),
        }
    }

    /// Creates an unknown tag error.
    pub fn unknown_tag(tag: impl Into<String>) -> Self {
        Self::UnknownTag { tag: tag.into() }
    }

    /// Creates a delivery error from a sink failure.
    pub fn delivery(source: BridgeError) -> Self {
        Self::Delivery { source }
    }

    /// Returns `true` if this error is retryable.
    ///
    /// A failed read aborts only the cycle it occurred in; the next cycle
    /// may well succeed, so it counts as retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DaError::Connection { .. }
                | DaError::NotConnected
                | DaError::ReadFailed { .. }
                | DaError::Delivery { .. }
        )
    }

    /// Returns the error type as a string for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            DaError::Connection { .. } => "connection",
            DaError::MissingServerIdentity => "missing_server_identity",
            DaError::InvalidClsId { .. } => "invalid_cls_id",
            DaError::NotConnected => "not_connected",
            DaError::PathSegmentNotFound { .. } => "path_segment_not_found",
            DaError::TagRegistrationFailed { .. } => "tag_registration_failed",
            DaError::ReadFailed { .. } => "read_failed",
            DaError::WriteFailed { .. } => "write_failed",
            DaError::UnsupportedValueType { .. } => "unsupported_value_type",
            DaError::UnknownTag { .. } => "unknown_tag",
            DaError::Delivery { .. } => "delivery",
        }
    }
}

impl From<DaError> for BridgeError {
    fn from(err: DaError) -> Self {
        match err {
            DaError::Connection { message, source } => BridgeError::Connection { message, source },
            DaError::NotConnected => BridgeError::NotConnected,
            DaError::MissingServerIdentity | DaError::InvalidClsId { .. } => {
                BridgeError::configuration(err.to_string())
            }
            DaError::ReadFailed { item_id, message } => BridgeError::read(item_id, message),
            DaError::WriteFailed { item_id, message } => BridgeError::write(item_id, message),
            DaError::UnknownTag { ref tag } => BridgeError::write(tag.clone(), err.to_string()),
            DaError::Delivery { source } => source,
            other => BridgeError::connection(other.to_string()),
        }
    }
}

/// A Result type with DaError.
pub type DaResult<T> = Result<T, DaError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DaError::connection("refused").is_retryable());
        assert!(DaError::NotConnected.is_retryable());
        assert!(DaError::read_failed("t", "bad quality").is_retryable());
        assert!(!DaError::MissingServerIdentity.is_retryable());
        assert!(!DaError::unknown_tag("t").is_retryable());
        assert!(!DaError::write_failed("t", "rejected").is_retryable());
    }

    #[test]
    fn test_path_error_message_carries_candidates() {
        let error = DaError::path_not_found("Line9", "[B]Line1\n[T]Counter");
        let message = error.to_string();

        assert!(message.contains("Line9"));
        assert!(message.contains("[B]Line1"));
        assert!(message.contains("[T]Counter"));
    }

    #[test]
    fn test_bridge_error_conversion() {
        let bridge: BridgeError = DaError::MissingServerIdentity.into();
        assert_eq!(bridge.error_type(), "configuration");

        let bridge: BridgeError = DaError::read_failed("tag", "boom").into();
        assert_eq!(bridge.error_type(), "read");
    }
}
