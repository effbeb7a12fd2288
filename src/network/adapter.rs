//! Core network types for adapter representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::subnet::SENTINEL_MASK;

/// Identity of one live network adapter, as reported by an enumeration call.
///
/// Descriptors are recreated on every enumeration and never persisted;
/// profiles (see [`crate::profile`]) are the durable shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    /// Stable OS identifier (e.g., "Ethernet", "WLAN").
    pub name: String,
    /// Display name, which may differ from `name` on renamed adapters.
    pub alias: String,
    /// Hardware description (e.g., "Intel(R) Ethernet Connection I219-LM").
    pub description: String,
    /// OS-assigned interface index.
    pub index: u32,
    /// Derived from device identifier heuristics; best-effort.
    pub is_wireless: bool,
}

impl AdapterDescriptor {
    /// Creates a new adapter descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
        index: u32,
        is_wireless: bool,
    ) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            description: description.into(),
            index,
            is_wireless,
        }
    }

    /// Returns a short label for display: alias plus connection kind.
    #[must_use]
    pub fn label(&self) -> String {
        let kind = if self.is_wireless { "Wi-Fi" } else { "Wired" };
        format!("{} ({kind})", self.alias)
    }
}

impl fmt::Display for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// DHCP state of an adapter's IPv4 interface.
///
/// Tri-state because the OS query can fail partially: an adapter whose DHCP
/// flag could not be read is `Unknown`, not silently `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DhcpState {
    /// DHCP is assigning this adapter's address.
    Enabled,
    /// The adapter carries static (or no) configuration.
    Disabled,
    /// The DHCP flag could not be determined.
    #[default]
    Unknown,
}

impl fmt::Display for DhcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "Enabled"),
            Self::Disabled => write!(f, "Disabled"),
            Self::Unknown => write!(f, ""),
        }
    }
}

/// Live IPv4 configuration of one adapter at a point in time.
///
/// Produced fresh by every backend read; an immutable observation, never
/// persisted directly. `subnet_mask` as returned by a backend may still be
/// a raw prefix-length string; [`crate::engine::ConfigurationEngine`]
/// normalizes it to dotted-decimal before anything user-facing sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdapterIpConfig {
    /// Dotted-decimal address; empty when unconfigured.
    pub address: String,
    /// Dotted-decimal mask; [`SENTINEL_MASK`] when no network is present.
    pub subnet_mask: String,
    /// Default gateway; empty when none is set.
    pub gateway: String,
    /// DNS servers in resolution order. The data model keeps all entries;
    /// the presentation boundary renders at most two.
    pub dns_servers: Vec<String>,
    /// DHCP state of the interface.
    pub dhcp: DhcpState,
}

impl AdapterIpConfig {
    /// Returns the configuration of an adapter with no IPv4 network:
    /// empty fields and the sentinel mask.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            subnet_mask: SENTINEL_MASK.to_string(),
            ..Self::default()
        }
    }

    /// Returns true if the adapter carries an address.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }
}
