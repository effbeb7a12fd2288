//! Configuration engine: orchestrates backend calls with consistent
//! ordering and translates their outcomes for the presentation layer.
//!
//! The engine is the only component that invokes mutating operations on a
//! live adapter, and no raw [`BackendError`](crate::network::BackendError)
//! crosses its boundary: reads
//! degrade to empty values plus a surfaced warning, mutations come back as
//! [`Outcome`] values.
//!
//! # Clear-before-set
//!
//! Static assignment and DHCP are mutually exclusive states; writing one on
//! top of residual traces of the other risks ghost addresses and stale
//! routes. The engine therefore retracts existing configuration before
//! every apply/enable, unconditionally; there is no flag to skip it. Per
//! adapter the reachable transitions are:
//!
//! ```text
//! {Unconfigured} --apply static--> {Static}
//! {Unconfigured} --enable dhcp---> {DHCP}
//! {Static}/{DHCP} --clear--------> {Unconfigured}
//! ```
//!
//! with no direct Static/DHCP edge; both pass through the clear.

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::fmt;
use std::net::Ipv4Addr;

use crate::network::{AdapterBackend, AdapterDescriptor, AdapterIpConfig, StaticAssignment};
use crate::subnet::{self, SENTINEL_MASK, SubnetError, SubnetSpec};

/// Result of a mutating engine operation, tagged with the adapter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The adapter the operation targeted.
    pub adapter: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Short human-readable reason or confirmation.
    pub detail: String,
}

impl Outcome {
    fn succeeded(adapter: &str, detail: impl Into<String>) -> Self {
        Self {
            adapter: adapter.to_string(),
            success: true,
            detail: detail.into(),
        }
    }

    fn failed(adapter: &str, detail: impl Into<String>) -> Self {
        Self {
            adapter: adapter.to_string(),
            success: false,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "{}: {}", self.adapter, self.detail)
        } else {
            write!(f, "{}: FAILED: {}", self.adapter, self.detail)
        }
    }
}

/// Result of an adapter enumeration.
///
/// Enumeration failure is non-fatal: the list comes back empty and the
/// reason is surfaced for display.
#[derive(Debug)]
pub struct AdapterList {
    /// The adapters found (empty on backend failure).
    pub adapters: Vec<AdapterDescriptor>,
    /// Why the listing is degraded, if it is.
    pub warning: Option<String>,
}

/// Result of a configuration read.
///
/// Read failure is non-fatal: the config degrades to
/// [`AdapterIpConfig::unconfigured`] and the reason is surfaced.
#[derive(Debug)]
pub struct ConfigReport {
    /// The adapter that was read.
    pub adapter: String,
    /// The (normalized) live configuration.
    pub config: AdapterIpConfig,
    /// Why the report is degraded, if it is.
    pub warning: Option<String>,
}

/// Orchestrates [`AdapterBackend`] calls and normalizes their results.
#[derive(Debug)]
pub struct ConfigurationEngine<B> {
    backend: B,
}

impl<B: AdapterBackend> ConfigurationEngine<B> {
    /// Creates an engine over the given backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns a reference to the underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Enumerates adapters, degrading to an empty list on failure.
    pub fn list_adapters(&self) -> AdapterList {
        match self.backend.enumerate() {
            Ok(adapters) => AdapterList {
                adapters,
                warning: None,
            },
            Err(e) => {
                tracing::warn!("Adapter enumeration failed: {e}");
                AdapterList {
                    adapters: Vec::new(),
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    /// Reads and normalizes one adapter's live configuration.
    ///
    /// Backends may report the subnet as a raw prefix-length string; this
    /// converts it to the canonical dotted mask. Entirely absent subnet
    /// information becomes the sentinel mask.
    pub fn get_config(&self, adapter: &str) -> ConfigReport {
        match self.backend.read_config(adapter) {
            Ok(mut config) => {
                let warning = normalize_subnet(&mut config);
                if let Some(w) = &warning {
                    tracing::warn!("Config for {adapter}: {w}");
                }
                ConfigReport {
                    adapter: adapter.to_string(),
                    config,
                    warning,
                }
            }
            Err(e) => {
                tracing::warn!("Reading config for {adapter} failed: {e}");
                ConfigReport {
                    adapter: adapter.to_string(),
                    config: AdapterIpConfig::unconfigured(),
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    /// Applies a static IPv4 configuration to an adapter.
    ///
    /// Sequencing invariant: a clear always precedes the apply, even on a
    /// freshly seen adapter. Input validation failures and backend
    /// failures both come back as failed outcomes.
    pub fn apply_static(
        &self,
        adapter: &str,
        address: &str,
        spec: &SubnetSpec,
        gateway: Option<&str>,
        dns_servers: &[String],
    ) -> Outcome {
        let assignment = match build_assignment(address, spec, gateway, dns_servers) {
            Ok(assignment) => assignment,
            Err(detail) => return Outcome::failed(adapter, detail),
        };

        if let Err(e) = self.clear_for(adapter) {
            return e;
        }

        match self.backend.apply_static(adapter, &assignment) {
            Ok(()) => {
                tracing::info!(
                    "Applied {}/{} to {adapter}",
                    assignment.address,
                    assignment.prefix_length
                );
                Outcome::succeeded(
                    adapter,
                    format!(
                        "Static configuration {}/{} applied",
                        assignment.address, assignment.prefix_length
                    ),
                )
            }
            Err(e) => Outcome::failed(adapter, format!("Static configuration failed: {e}")),
        }
    }

    /// Re-enables DHCP on an adapter, clearing static state first.
    pub fn enable_dhcp(&self, adapter: &str) -> Outcome {
        if let Err(e) = self.clear_for(adapter) {
            return e;
        }

        match self.backend.enable_dhcp(adapter) {
            Ok(()) => {
                tracing::info!("Enabled DHCP on {adapter}");
                Outcome::succeeded(adapter, "DHCP enabled")
            }
            Err(e) => Outcome::failed(adapter, format!("Enabling DHCP failed: {e}")),
        }
    }

    /// Retracts all IPv4 configuration from an adapter.
    pub fn clear_config(&self, adapter: &str) -> Outcome {
        match self.backend.clear_config(adapter) {
            Ok(()) => {
                tracing::info!("Cleared configuration on {adapter}");
                Outcome::succeeded(adapter, "Configuration cleared")
            }
            Err(e) => Outcome::failed(adapter, format!("Clearing configuration failed: {e}")),
        }
    }

    /// The mandatory pre-mutation clear, as a failed outcome on error.
    fn clear_for(&self, adapter: &str) -> Result<(), Outcome> {
        self.backend.clear_config(adapter).map_err(|e| {
            Outcome::failed(
                adapter,
                format!("Clearing previous configuration failed: {e}"),
            )
        })
    }
}

/// Builds the typed assignment block, validating every address field.
fn build_assignment(
    address: &str,
    spec: &SubnetSpec,
    gateway: Option<&str>,
    dns_servers: &[String],
) -> Result<StaticAssignment, String> {
    validate_ipv4("address", address)?;
    if let Some(gw) = gateway {
        validate_ipv4("gateway", gw)?;
    }
    for dns in dns_servers {
        validate_ipv4("DNS server", dns)?;
    }

    let (subnet_mask, prefix_length) = spec
        .normalize()
        .map_err(|e: SubnetError| e.to_string())?;

    Ok(StaticAssignment {
        address: address.to_string(),
        subnet_mask,
        prefix_length,
        gateway: gateway.map(ToString::to_string),
        dns_servers: dns_servers.to_vec(),
    })
}

fn validate_ipv4(field: &str, value: &str) -> Result<(), String> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| format!("Invalid {field} '{value}': not an IPv4 address"))
}

/// Normalizes the subnet representation in a freshly read config.
///
/// Returns a warning when the reported mask had to be discarded.
fn normalize_subnet(config: &mut AdapterIpConfig) -> Option<String> {
    if config.subnet_mask.is_empty() {
        config.subnet_mask = SENTINEL_MASK.to_string();
        return None;
    }

    match subnet::mask_to_prefix(&config.subnet_mask)
        .and_then(|prefix| subnet::prefix_to_mask(u32::from(prefix)))
    {
        Ok(mask) => {
            config.subnet_mask = mask;
            None
        }
        Err(e) => {
            let warning = format!(
                "unusable subnet '{}' reported by backend: {e}",
                config.subnet_mask
            );
            config.subnet_mask = SENTINEL_MASK.to_string();
            Some(warning)
        }
    }
}
