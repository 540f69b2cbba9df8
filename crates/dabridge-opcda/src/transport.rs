// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session transport abstraction.
//!
//! [`DaTransport`] is the seam between the bridge and the DCOM session layer.
//! Production bindings implement it over the native OPC-DA client; tests
//! implement it over an in-memory namespace. Everything above this trait is
//! transport-agnostic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::browse::Branch;
use crate::config::EndpointConfig;
use crate::error::DaResult;
use crate::wire::{ItemState, Variant};

// =============================================================================
// TransportState
// =============================================================================

/// Connection state of the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// No session.
    #[default]
    Disconnected,

    /// Session is being established.
    Connecting,

    /// Session is up.
    Connected,

    /// Session failed.
    Failed,
}

impl TransportState {
    /// Returns `true` if the session is up.
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

// =============================================================================
// Handles
// =============================================================================

/// Opaque handle to a registered server group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupHandle(u32);

impl GroupHandle {
    /// Wraps a raw server handle.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw server handle.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Opaque handle to an item registered within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle(u32);

impl ItemHandle {
    /// Wraps a raw server handle.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw server handle.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// DaTransport
// =============================================================================

/// Abstract OPC-DA session layer.
///
/// Implementations own the server connection and the registered groups and
/// items. The endpoint serializes access behind a mutex, so implementations
/// do not need to be internally re-entrant.
#[async_trait]
pub trait DaTransport: Send + Sync {
    /// Establishes the server session.
    async fn connect(&mut self, config: &EndpointConfig) -> DaResult<()>;

    /// Tears the session down, releasing all groups and items.
    async fn disconnect(&mut self) -> DaResult<()>;

    /// Current session state.
    fn state(&self) -> TransportState;

    /// Registers a named group with the server.
    async fn add_group(&mut self, name: &str) -> DaResult<GroupHandle>;

    /// Browses the server namespace from its root.
    async fn browse_root(&self) -> DaResult<Branch>;

    /// Registers an item within a group.
    async fn add_item(&self, group: GroupHandle, item_id: &str) -> DaResult<ItemHandle>;

    /// Reads an item's current state.
    ///
    /// With `force_hardware` set the server must bypass its cache and read
    /// from the device.
    async fn read_item(&self, item: ItemHandle, force_hardware: bool) -> DaResult<ItemState>;

    /// Writes a wire value to an item.
    async fn write_item(&self, item: ItemHandle, value: Variant) -> DaResult<()>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state() {
        assert!(TransportState::Connected.is_connected());
        assert!(!TransportState::Disconnected.is_connected());
        assert_eq!(TransportState::default(), TransportState::Disconnected);
    }

    #[test]
    fn test_handles_are_opaque_copies() {
        let group = GroupHandle::new(7);
        let copy = group;
        assert_eq!(copy.raw(), 7);

        let item = ItemHandle::new(42);
        assert_eq!(item, ItemHandle::new(42));
        assert_ne!(item, ItemHandle::new(43));
    }
}
