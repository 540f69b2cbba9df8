// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Polling snapshot engine.
//!
//! Each [`PollEngine::poll`] call reads every registered tag in table order,
//! decodes the values, and assembles a [`Changeset`]. In diff-only mode a tag
//! is included only when its value differs from the previous cycle; metadata
//! never participates in the comparison. Empty changesets are not delivered.
//!
//! Cycles are fail-fast: the first read error aborts the cycle and leaves
//! the previous-snapshot store exactly as it was, so the next cycle diffs
//! against the last fully-read state.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use dabridge_core::{Changeset, ChangesetSink, SnapshotMeta, TagId, TagSnapshot, TagValue};

use crate::codec;
use crate::config::EndpointConfig;
use crate::error::{DaError, DaResult};
use crate::transport::{DaTransport, ItemHandle};

// =============================================================================
// PollOptions
// =============================================================================

/// Options controlling snapshot assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Emit only tags whose value changed since the previous cycle.
    pub diff_only: bool,
    /// Emit bare values without read metadata.
    pub values_only: bool,
    /// Bypass the server cache on reads.
    pub force_hardware_read: bool,
}

impl PollOptions {
    /// Extracts the polling options from an endpoint configuration.
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self {
            diff_only: config.diff_only,
            values_only: config.values_only,
            force_hardware_read: config.force_hardware_read,
        }
    }
}

// =============================================================================
// PollEngine
// =============================================================================

/// Reads registered tags each cycle and delivers changesets to the sink.
pub struct PollEngine<T: DaTransport> {
    /// The session transport.
    transport: Arc<Mutex<T>>,
    /// Frozen registered-tag table.
    items: Arc<BTreeMap<TagId, ItemHandle>>,
    /// Snapshot assembly options.
    options: PollOptions,
    /// Values observed in the last completed cycle. Only `poll` mutates this.
    previous: HashMap<TagId, TagValue>,
    /// Downstream delivery.
    sink: Arc<dyn ChangesetSink>,
}

impl<T: DaTransport> PollEngine<T> {
    pub(crate) fn new(
        transport: Arc<Mutex<T>>,
        items: Arc<BTreeMap<TagId, ItemHandle>>,
        options: PollOptions,
        sink: Arc<dyn ChangesetSink>,
    ) -> Self {
        Self {
            transport,
            items,
            options,
            previous: HashMap::new(),
            sink,
        }
    }

    /// Runs one poll cycle.
    ///
    /// Returns the number of changesets delivered: `1`, or `0` when the
    /// cycle produced no changes (or no tags are registered). A read failure
    /// aborts the cycle without touching the previous-snapshot store; a sink
    /// failure surfaces as [`DaError::Delivery`].
    pub async fn poll(&mut self) -> DaResult<u32> {
        let mut changeset = Changeset::new();
        let mut observed: Vec<(TagId, TagValue)> = Vec::new();

        for (tag, handle) in self.items.iter() {
            // lock per call so a write batch can interleave between reads
            let state = self
                .transport
                .lock()
                .await
                .read_item(*handle, self.options.force_hardware_read)
                .await?;
            let value = codec::decode(&state.value);

            let changed = match self.previous.get(tag) {
                None => true,
                Some(prev) => *prev != value,
            };

            if self.options.diff_only && !changed {
                continue;
            }

            let snapshot = if self.options.values_only {
                TagSnapshot::value_only(value.clone())
            } else {
                TagSnapshot::with_meta(
                    value.clone(),
                    SnapshotMeta {
                        error_code: state.error_code,
                        quality: state.quality,
                        timestamp_epoch_millis: state.timestamp,
                    },
                )
            };

            changeset.insert(tag.clone(), snapshot);
            observed.push((tag.clone(), value));
        }

        // every read succeeded; commit the cycle's observations
        for (tag, value) in observed {
            self.previous.insert(tag, value);
        }

        if changeset.is_empty() {
            tracing::trace!("poll cycle produced no changes, skipping delivery");
            return Ok(0);
        }

        let tags = changeset.len();
        self.sink
            .deliver(changeset)
            .await
            .map_err(DaError::delivery)?;

        tracing::trace!(tags, "changeset delivered");
        Ok(1)
    }

    /// Polls on a fixed interval until a non-retryable error occurs.
    ///
    /// Retryable failures (failed reads, connection drops, sink hiccups) are
    /// logged and the loop continues with the next tick.
    pub async fn run(&mut self, interval: Duration) -> DaResult<()> {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            match self.poll().await {
                Ok(_) => {}
                Err(e) if e.is_retryable() => {
                    tracing::warn!(error = %e, "poll cycle failed, retrying next interval");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Number of tags the engine polls each cycle.
    pub fn tag_count(&self) -> usize {
        self.items.len()
    }
}

impl<T: DaTransport> std::fmt::Debug for PollEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollEngine")
            .field("tags", &self.items.len())
            .field("options", &self.options)
            .finish()
    }
}
