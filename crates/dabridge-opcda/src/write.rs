// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Write dispatcher.
//!
//! Applies a batch of tag writes to the server through the frozen
//! registered-tag table. A batch addressing an unregistered tag either fails
//! hard or skips the tag, depending on the configured policy.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use dabridge_core::{TagId, TagValue};

use crate::codec;
use crate::error::{DaError, DaResult};
use crate::transport::{DaTransport, ItemHandle};

// =============================================================================
// WriteDispatcher
// =============================================================================

/// Dispatches value writes to registered tags.
pub struct WriteDispatcher<T: DaTransport> {
    /// The session transport.
    transport: Arc<Mutex<T>>,
    /// Frozen registered-tag table.
    items: Arc<BTreeMap<TagId, ItemHandle>>,
    /// Fail the batch on unregistered tags instead of skipping them.
    fail_if_tag_absent: bool,
}

impl<T: DaTransport> WriteDispatcher<T> {
    pub(crate) fn new(
        transport: Arc<Mutex<T>>,
        items: Arc<BTreeMap<TagId, ItemHandle>>,
        fail_if_tag_absent: bool,
    ) -> Self {
        Self {
            transport,
            items,
            fail_if_tag_absent,
        }
    }

    /// Writes a batch of values, returning how many were written.
    ///
    /// Writes are applied in iteration order and the batch fails fast: an
    /// unregistered tag (under the strict policy), an unencodable value, or
    /// a transport failure aborts the remainder. Array values are not
    /// writable on this wire and degrade to the wire null rather than
    /// failing; [`TagValue::Fallback`] values are a hard error.
    ///
    /// The transport is locked per write, so a batch interleaves with a
    /// concurrently running poll cycle instead of stalling behind it.
    pub async fn dispatch<I>(&self, writes: I) -> DaResult<u32>
    where
        I: IntoIterator<Item = (TagId, TagValue)>,
    {
        let mut written = 0u32;

        for (tag, value) in writes {
            let Some(handle) = self.items.get(&tag) else {
                if self.fail_if_tag_absent {
                    return Err(DaError::unknown_tag(tag.as_str()));
                }
                tracing::debug!(tag = %tag, "tag not registered, skipping write");
                continue;
            };

            let variant = codec::encode(&value)?;
            self.transport
                .lock()
                .await
                .write_item(*handle, variant)
                .await?;

            tracing::trace!(tag = %tag, kind = value.type_name(), "value written");
            written += 1;
        }

        Ok(written)
    }

    /// Writes a single value.
    pub async fn write(&self, tag: TagId, value: TagValue) -> DaResult<()> {
        self.dispatch([(tag, value)]).await.map(|_| ())
    }
}

impl<T: DaTransport> std::fmt::Debug for WriteDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteDispatcher")
            .field("tags", &self.items.len())
            .field("fail_if_tag_absent", &self.fail_if_tag_absent)
            .finish()
    }
}
