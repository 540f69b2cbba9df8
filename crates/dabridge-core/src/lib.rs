// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # dabridge-core
//!
//! Core abstractions shared across the dabridge OPC-DA tag bridge.
//!
//! This crate provides the protocol-agnostic pieces of the bridge:
//!
//! - **Types**: `TagId`, `TagValue`, `TagSnapshot`, `Changeset`
//! - **Error**: the `BridgeError` hierarchy
//! - **Sink**: the `ChangesetSink` delivery trait
//!
//! Everything wire- or protocol-specific lives in `dabridge-opcda`.
//!
//! ## Example
//!
//! ```rust
//! use dabridge_core::{Changeset, TagId, TagSnapshot, TagValue};
//!
//! let mut changeset = Changeset::new();
//! changeset.insert(
//!     TagId::new("Plant/Line1/Temperature"),
//!     TagSnapshot::value_only(TagValue::Float64(25.5)),
//! );
//! assert_eq!(changeset.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod sink;
pub mod types;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::{BridgeError, BridgeResult};
pub use sink::{ChangesetSink, NoOpSink};
pub use types::{Changeset, SnapshotMeta, TagId, TagSnapshot, TagValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
