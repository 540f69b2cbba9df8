// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Endpoint configuration.
//!
//! The server is addressed either by its COM class ID (a GUID) or by its
//! program ID; exactly one of the two must be set. All other options carry
//! defaults matching a plain read-everything deployment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DaError, DaResult};

// =============================================================================
// EndpointConfig
// =============================================================================

/// Configuration for one OPC-DA endpoint.
///
/// # Examples
///
/// ```
/// use dabridge_opcda::config::EndpointConfig;
///
/// let config = EndpointConfig::builder()
///     .host("10.0.0.5")
///     .username("opc")
///     .password("secret")
///     .prog_id("Matrikon.OPC.Simulation.1")
///     .path("Plant/Line1")
///     .diff_only(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.pool_size, 2);
/// assert_eq!(config.delay_ms, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointConfig {
    /// Server host name or address.
    pub host: String,

    /// Authentication domain.
    pub domain: String,

    /// Authentication user name.
    pub username: String,

    /// Authentication password.
    pub password: String,

    /// COM class ID of the server (a GUID). Mutually exclusive with `prog_id`.
    pub cls_id: Option<String>,

    /// Program ID of the server. Mutually exclusive with `cls_id`.
    pub prog_id: Option<String>,

    /// Slash-delimited path into the server namespace. Empty selects the
    /// whole namespace.
    pub path: String,

    /// Size of the session thread pool provisioned by the host.
    pub pool_size: usize,

    /// Delay between poll cycles, in milliseconds.
    pub delay_ms: u64,

    /// Emit only tags whose value changed since the previous cycle.
    pub diff_only: bool,

    /// Emit bare values without read metadata.
    pub values_only: bool,

    /// Bypass the server cache and read from the device.
    pub force_hardware_read: bool,

    /// Fail a write batch when it addresses an unregistered tag.
    pub fail_if_tag_absent: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            domain: "localhost".to_string(),
            username: String::new(),
            password: String::new(),
            cls_id: None,
            prog_id: None,
            path: String::new(),
            pool_size: 2,
            delay_ms: 500,
            diff_only: false,
            values_only: true,
            force_hardware_read: false,
            fail_if_tag_absent: true,
        }
    }
}

impl EndpointConfig {
    /// Returns a builder with default settings.
    pub fn builder() -> EndpointConfigBuilder {
        EndpointConfigBuilder::default()
    }

    /// The poll delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Validates the configuration.
    ///
    /// Exactly one of `cls_id`/`prog_id` must be set, and `cls_id` must be a
    /// syntactically valid GUID when present.
    pub fn validate(&self) -> DaResult<()> {
        match (&self.cls_id, &self.prog_id) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => return Err(DaError::MissingServerIdentity),
        }

        if let Some(cls_id) = &self.cls_id {
            let trimmed = cls_id.trim_matches(|c| c == '{' || c == '}');
            Uuid::parse_str(trimmed).map_err(|_| DaError::invalid_cls_id(cls_id))?;
        }

        Ok(())
    }
}

// =============================================================================
// EndpointConfigBuilder
// =============================================================================

/// Builder for [`EndpointConfig`].
#[derive(Debug, Clone, Default)]
pub struct EndpointConfigBuilder {
    config: EndpointConfig,
}

impl EndpointConfigBuilder {
    /// Sets the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the authentication domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = domain.into();
        self
    }

    /// Sets the authentication user name.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Sets the authentication password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Sets the server class ID.
    pub fn cls_id(mut self, cls_id: impl Into<String>) -> Self {
        self.config.cls_id = Some(cls_id.into());
        self
    }

    /// Sets the server program ID.
    pub fn prog_id(mut self, prog_id: impl Into<String>) -> Self {
        self.config.prog_id = Some(prog_id.into());
        self
    }

    /// Sets the namespace path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Sets the session thread pool size.
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.config.pool_size = pool_size;
        self
    }

    /// Sets the delay between poll cycles.
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Sets diff-only emission.
    pub fn diff_only(mut self, diff_only: bool) -> Self {
        self.config.diff_only = diff_only;
        self
    }

    /// Sets values-only records.
    pub fn values_only(mut self, values_only: bool) -> Self {
        self.config.values_only = values_only;
        self
    }

    /// Sets forced hardware reads.
    pub fn force_hardware_read(mut self, force: bool) -> Self {
        self.config.force_hardware_read = force;
        self
    }

    /// Sets the unregistered-tag write policy.
    pub fn fail_if_tag_absent(mut self, fail: bool) -> Self {
        self.config.fail_if_tag_absent = fail;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> DaResult<EndpointConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EndpointConfig::default();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.domain, "localhost");
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.delay_ms, 500);
        assert!(!config.diff_only);
        assert!(config.values_only);
        assert!(!config.force_hardware_read);
        assert!(config.fail_if_tag_absent);
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let error = EndpointConfig::builder().build().unwrap_err();
        assert!(matches!(error, DaError::MissingServerIdentity));
    }

    #[test]
    fn test_both_identities_are_rejected() {
        let error = EndpointConfig::builder()
            .cls_id("F8582CF2-88FB-11D0-B850-00C0F0104305")
            .prog_id("Matrikon.OPC.Simulation.1")
            .build()
            .unwrap_err();

        assert!(matches!(error, DaError::MissingServerIdentity));
    }

    #[test]
    fn test_cls_id_accepts_braced_guid() {
        let config = EndpointConfig::builder()
            .cls_id("{F8582CF2-88FB-11D0-B850-00C0F0104305}")
            .build()
            .unwrap();

        assert!(config.cls_id.is_some());
    }

    #[test]
    fn test_cls_id_rejects_non_guid() {
        let error = EndpointConfig::builder()
            .cls_id("not-a-guid")
            .build()
            .unwrap_err();

        assert!(matches!(error, DaError::InvalidClsId { .. }));
    }

    #[test]
    fn test_prog_id_alone_is_valid() {
        let config = EndpointConfig::builder()
            .prog_id("Matrikon.OPC.Simulation.1")
            .path("Plant/Line1")
            .build()
            .unwrap();

        assert_eq!(config.path, "Plant/Line1");
    }

    #[test]
    fn test_delay_duration() {
        let config = EndpointConfig::default();
        assert_eq!(config.delay(), Duration::from_millis(500));
    }
}
