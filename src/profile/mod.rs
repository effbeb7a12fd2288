//! Durable, user-curated IP profiles.
//!
//! A profile is a saved static configuration keyed by its address: a
//! durable intent, independent of any adapter's live state. The store
//! loads once at startup, lives in memory, and is flushed whole on an
//! explicit save.

mod store;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use store::ProfileStore;

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user-saved static configuration, keyed by its own address.
///
/// Serialized with the historical on-disk field names so existing
/// `record.json` files stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpProfile {
    /// The IPv4 address; doubles as the profile's key.
    #[serde(rename = "IPv4Address")]
    pub address: String,

    /// Dotted-decimal subnet mask.
    #[serde(rename = "SubnetMask")]
    pub subnet_mask: String,

    /// Default gateway; empty when none is saved.
    #[serde(rename = "IPv4DefaultGateway", default)]
    pub gateway: String,

    /// DNS servers in resolution order (0-2 entries saved in practice).
    #[serde(rename = "DNSServer", default)]
    pub dns_servers: Vec<String>,
}

/// Result of opening the profile store's backing file.
///
/// Explicitly models all valid states:
/// - A previous file loaded successfully
/// - No file existed (an empty one is created)
/// - A file existed but could not be parsed, a non-fatal warning; the
///   store starts empty and overwrites on the next save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Loaded this many profiles from an existing file.
    Loaded(usize),

    /// No file existed; an empty one was created.
    Created,

    /// The file exists but is not valid profile data.
    Unreadable {
        /// Reason for the failure (for logging/debugging).
        reason: String,
    },
}

impl LoadOutcome {
    /// Returns `true` if an existing file was read successfully.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Errors that can occur when persisting profiles.
///
/// Only covers the write side; read-side issues degrade to
/// [`LoadOutcome`] variants so a damaged file never aborts the process.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Failed to write the profile file.
    #[error("Failed to write profile file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize profiles to JSON.
    #[error("Failed to serialize profiles: {0}")]
    Serialize(#[source] serde_json::Error),
}
