// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Downstream delivery trait.
//!
//! The polling engine hands each non-empty changeset to exactly one
//! [`ChangesetSink`]. Hosts implement this trait to route snapshots into
//! their own pipeline (message bus, HTTP push, file, ...).

use async_trait::async_trait;

use crate::error::BridgeResult;
use crate::types::Changeset;

// =============================================================================
// ChangesetSink
// =============================================================================

/// Receives changesets produced by poll cycles.
///
/// Implementations must be `Send + Sync`; the engine awaits delivery before
/// starting the next cycle, so a slow sink backpressures polling naturally.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use dabridge_core::{BridgeResult, Changeset, ChangesetSink};
///
/// struct PrintSink;
///
/// #[async_trait]
/// impl ChangesetSink for PrintSink {
///     async fn deliver(&self, changeset: Changeset) -> BridgeResult<()> {
///         for (tag, snapshot) in &changeset {
///             println!("{} = {}", tag, snapshot.value);
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ChangesetSink: Send + Sync {
    /// Delivers one changeset downstream.
    ///
    /// A returned error aborts the current poll cycle and is surfaced to the
    /// caller as a delivery failure.
    async fn deliver(&self, changeset: Changeset) -> BridgeResult<()>;
}

// =============================================================================
// NoOpSink
// =============================================================================

/// A sink that discards every changeset.
///
/// Useful for tests and for endpoints that are only written to.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

#[async_trait]
impl ChangesetSink for NoOpSink {
    async fn deliver(&self, _changeset: Changeset) -> BridgeResult<()> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TagId, TagSnapshot, TagValue};

    #[tokio::test]
    async fn test_noop_sink_accepts_everything() {
        let sink = NoOpSink;
        let mut changeset = Changeset::new();
        changeset.insert(TagId::new("a"), TagSnapshot::value_only(TagValue::Bool(true)));

        assert!(sink.deliver(changeset).await.is_ok());
        assert!(sink.deliver(Changeset::new()).await.is_ok());
    }
}
