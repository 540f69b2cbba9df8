// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # dabridge-opcda
//!
//! OPC-DA (OPC Classic) endpoint for the dabridge tag bridge.
//!
//! The crate bridges a DCOM-based OPC-DA server into the `dabridge-core`
//! value model:
//!
//! - **Wire**: the closed VARIANT model handed over by the session layer
//! - **Codec**: total decode into `TagValue`, fallible encode for writes
//! - **Browse**: namespace snapshot and slash-delimited path resolution
//! - **Endpoint**: session lifecycle and tag registration
//! - **Poll**: the snapshot engine delivering changesets to a sink
//! - **Write**: the value write dispatcher
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Endpoint<T>                                 │
//! │         (lifecycle, browse + resolve, tag registration)         │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                                      │
//!            ▼                                      ▼
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │      PollEngine<T>       │        │    WriteDispatcher<T>    │
//! │  (read, decode, diff,    │        │  (lookup, encode, write) │
//! │   deliver to sink)       │        │                          │
//! └──────────────────────────┘        └──────────────────────────┘
//!            │                                      │
//!            └──────────────────┬───────────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     DaTransport (trait)                         │
//! │                  (abstract DCOM session layer)                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dabridge_core::NoOpSink;
//! use dabridge_opcda::{Endpoint, EndpointConfig};
//!
//! let config = EndpointConfig::builder()
//!     .host("10.0.0.5")
//!     .prog_id("Matrikon.OPC.Simulation.1")
//!     .path("Plant/Line1")
//!     .diff_only(true)
//!     .build()?;
//!
//! let mut endpoint = Endpoint::new(config, transport, "line1".to_string());
//! endpoint.initialize().await?;
//!
//! let mut poller = endpoint.poller(Arc::new(NoOpSink))?;
//! poller.run(endpoint.config().delay()).await?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod browse;
pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod poll;
pub mod transport;
pub mod wire;
pub mod write;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use browse::{resolve, Branch, Leaf, Resolution};
pub use codec::{decode, encode};
pub use config::{EndpointConfig, EndpointConfigBuilder};
pub use endpoint::{Endpoint, EndpointState};
pub use error::{DaError, DaResult};
pub use poll::{PollEngine, PollOptions};
pub use transport::{DaTransport, GroupHandle, ItemHandle, TransportState};
pub use wire::{CurrencyParts, ItemState, Variant, VariantArray};
pub use write::WriteDispatcher;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
