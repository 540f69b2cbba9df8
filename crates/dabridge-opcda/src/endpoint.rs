// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Endpoint lifecycle.
//!
//! An [`Endpoint`] owns the transport session and the registered-tag table.
//! Initialization connects, registers one group named after the endpoint,
//! browses the namespace, resolves the configured path, and registers every
//! leaf in scope. The resulting tag table is frozen behind an `Arc`; the
//! polling engine and write dispatcher share it read-only.
//!
//! Lifecycle: `Uninitialized → Connected → ShuttingDown → Disconnected`.
//! Re-initializing a connected endpoint and shutting down a disconnected one
//! are both no-ops.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use dabridge_core::{ChangesetSink, TagId};

use crate::browse::{resolve, Branch, Leaf, Resolution};
use crate::config::EndpointConfig;
use crate::error::{DaError, DaResult};
use crate::poll::{PollEngine, PollOptions};
use crate::transport::{DaTransport, GroupHandle, ItemHandle};
use crate::write::WriteDispatcher;

// =============================================================================
// EndpointState
// =============================================================================

/// Lifecycle state of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Created but never initialized.
    Uninitialized,
    /// Connected with a frozen tag table.
    Connected,
    /// Shutdown in progress.
    ShuttingDown,
    /// Shut down.
    Disconnected,
}

// =============================================================================
// Endpoint
// =============================================================================

/// One OPC-DA server endpoint.
///
/// # Examples
///
/// ```rust,ignore
/// use dabridge_opcda::{Endpoint, EndpointConfig};
///
/// let config = EndpointConfig::builder()
///     .prog_id("Matrikon.OPC.Simulation.1")
///     .path("Plant/Line1")
///     .build()?;
///
/// let mut endpoint = Endpoint::new(config, transport, "line1".to_string());
/// endpoint.initialize().await?;
///
/// let mut poller = endpoint.poller(sink)?;
/// poller.poll().await?;
/// ```
pub struct Endpoint<T: DaTransport> {
    /// Endpoint name, also used as the server group name.
    name: String,
    /// Endpoint configuration.
    config: EndpointConfig,
    /// The session transport.
    transport: Arc<Mutex<T>>,
    /// Lifecycle state.
    state: EndpointState,
    /// The registered group.
    group: Option<GroupHandle>,
    /// Frozen registered-tag table, keyed by item ID.
    items: Arc<BTreeMap<TagId, ItemHandle>>,
}

impl<T: DaTransport + 'static> Endpoint<T> {
    /// Creates an endpoint over the given transport.
    pub fn new(config: EndpointConfig, transport: T, name: String) -> Self {
        Self {
            name,
            config,
            transport: Arc::new(Mutex::new(transport)),
            state: EndpointState::Uninitialized,
            group: None,
            items: Arc::new(BTreeMap::new()),
        }
    }

    /// The endpoint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The endpoint configuration.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// Tags registered during initialization, in table order.
    pub fn registered_tags(&self) -> Vec<TagId> {
        self.items.keys().cloned().collect()
    }

    /// Connects and registers the tags selected by the configured path.
    ///
    /// Calling this on an already connected endpoint is a no-op. A failure
    /// while registering leaves the endpoint un-connected; items registered
    /// before the failure are not rolled back individually, the session
    /// releases them wholesale on shutdown.
    pub async fn initialize(&mut self) -> DaResult<()> {
        if self.state == EndpointState::Connected {
            tracing::debug!(name = %self.name, "endpoint already connected, skipping initialization");
            return Ok(());
        }

        self.config.validate()?;

        let mut transport = self.transport.lock().await;
        transport.connect(&self.config).await?;
        let group = transport.add_group(&self.name).await?;
        let root = transport.browse_root().await?;

        let mut items = BTreeMap::new();
        match resolve(&root, &self.config.path)? {
            Resolution::Leaf(leaf) => {
                Self::register_leaf(&*transport, group, leaf, &mut items).await?;
            }
            Resolution::Subtree(branch) => {
                for leaf in branch.collect_leaves() {
                    Self::register_leaf(&*transport, group, leaf, &mut items).await?;
                }
            }
        }
        drop(transport);

        self.group = Some(group);
        self.items = Arc::new(items);
        self.state = EndpointState::Connected;

        tracing::info!(
            name = %self.name,
            host = %self.config.host,
            tags = self.items.len(),
            "endpoint connected"
        );

        Ok(())
    }

    async fn register_leaf(
        transport: &T,
        group: GroupHandle,
        leaf: &Leaf,
        items: &mut BTreeMap<TagId, ItemHandle>,
    ) -> DaResult<()> {
        let handle = transport
            .add_item(group, &leaf.item_id)
            .await
            .map_err(|e| DaError::registration_failed(&leaf.item_id, e))?;

        tracing::trace!(item_id = %leaf.item_id, "tag registered");
        items.insert(TagId::new(leaf.item_id.clone()), handle);
        Ok(())
    }

    /// Disconnects and releases the session.
    ///
    /// Idempotent: shutting down a disconnected endpoint is a no-op. If the
    /// transport fails to disconnect, the endpoint stays in `ShuttingDown`
    /// and the call can be retried.
    pub async fn shutdown(&mut self) -> DaResult<()> {
        if self.state == EndpointState::Disconnected {
            return Ok(());
        }

        self.state = EndpointState::ShuttingDown;

        let mut transport = self.transport.lock().await;
        transport.disconnect().await?;
        drop(transport);

        self.group = None;
        self.items = Arc::new(BTreeMap::new());
        self.state = EndpointState::Disconnected;

        tracing::info!(name = %self.name, "endpoint disconnected");
        Ok(())
    }

    /// Creates a polling engine over the frozen tag table.
    pub fn poller(&self, sink: Arc<dyn ChangesetSink>) -> DaResult<PollEngine<T>> {
        if self.state != EndpointState::Connected {
            return Err(DaError::NotConnected);
        }

        Ok(PollEngine::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.items),
            PollOptions::from_config(&self.config),
            sink,
        ))
    }

    /// Creates a write dispatcher over the frozen tag table.
    pub fn dispatcher(&self) -> DaResult<WriteDispatcher<T>> {
        if self.state != EndpointState::Connected {
            return Err(DaError::NotConnected);
        }

        Ok(WriteDispatcher::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.items),
            self.config.fail_if_tag_absent,
        ))
    }

    /// The namespace snapshot used for registration, re-browsed on demand.
    pub async fn browse(&self) -> DaResult<Branch> {
        let transport = self.transport.lock().await;
        transport.browse_root().await
    }
}

impl<T: DaTransport> std::fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("host", &self.config.host)
            .field("state", &self.state)
            .field("tags", &self.items.len())
            .finish()
    }
}
