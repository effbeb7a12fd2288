//! Network layer: adapter data model and the backend boundary.
//!
//! This module provides:
//! - Adapter identity and live configuration types ([`AdapterDescriptor`],
//!   [`AdapterIpConfig`], [`DhcpState`])
//! - The abstract backend capability ([`AdapterBackend`])
//! - Adapter filtering ([`filter`])
//! - The concrete PowerShell-based backend ([`platform`])

mod adapter;
mod backend;
pub mod filter;
pub mod platform;


pub use adapter::{AdapterDescriptor, AdapterIpConfig, DhcpState};
pub use backend::{AdapterBackend, BackendError, StaticAssignment};

#[cfg(test)]
pub use backend::mock;
