//! Subnet arithmetic: dotted-decimal masks and CIDR prefix lengths.
//!
//! Pure conversion functions with no state and no I/O. Every other module
//! that needs to reason about subnet notation goes through here, so the two
//! representations stay bidirectionally consistent.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Mask reported by the OS when an adapter carries no usable network.
///
/// `255.255.255.255` is a deliberately invalid host mask; it signals
/// "unconfigured" rather than describing a real network.
pub const SENTINEL_MASK: &str = "255.255.255.255";

/// Error type for subnet conversion operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubnetError {
    /// The input is neither a valid dotted mask nor a prefix integer in [0,32].
    #[error("Invalid subnet mask '{0}': expected a dotted mask or a prefix length in 0..=32")]
    InvalidMask(String),

    /// The prefix length is outside [0,32] or not an integer.
    #[error("Invalid prefix length '{0}': expected an integer in 0..=32")]
    InvalidPrefix(String),

    /// Exactly one of mask/prefix must be supplied.
    #[error("Invalid subnet argument: {0}")]
    Argument(&'static str),
}

/// A subnet given in either notation, before normalization.
///
/// The engine accepts user input in either form and converts to whichever
/// representation the backend call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnetSpec {
    /// Dotted-decimal mask, e.g. `255.255.255.0`.
    Mask(String),
    /// CIDR prefix length, e.g. `24`.
    Prefix(u8),
}

impl SubnetSpec {
    /// Resolves a spec from optional mask and prefix inputs.
    ///
    /// Exactly one of the two must be present; supplying both or neither is
    /// an argument error, not a parse error.
    ///
    /// # Errors
    ///
    /// Returns [`SubnetError::Argument`] for both/neither, or the relevant
    /// parse error for the supplied input.
    pub fn resolve(mask: Option<&str>, prefix: Option<&str>) -> Result<Self, SubnetError> {
        match (mask, prefix) {
            (Some(_), Some(_)) => Err(SubnetError::Argument(
                "supply either a mask or a prefix length, not both",
            )),
            (None, None) => Err(SubnetError::Argument(
                "a mask or a prefix length is required",
            )),
            (Some(m), None) => {
                // Validate eagerly so a bad mask fails here, not mid-apply.
                mask_to_prefix(m)?;
                Ok(Self::Mask(m.trim().to_string()))
            }
            (None, Some(p)) => {
                let prefix = parse_prefix(p)?;
                Ok(Self::Prefix(prefix))
            }
        }
    }

    /// Returns the canonical `(dotted_mask, prefix_length)` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the contained mask string is invalid (possible
    /// when a `Mask` was constructed directly rather than via `resolve`).
    pub fn normalize(&self) -> Result<(String, u8), SubnetError> {
        match self {
            Self::Mask(mask) => {
                let prefix = mask_to_prefix(mask)?;
                Ok((prefix_to_mask(u32::from(prefix))?, prefix))
            }
            Self::Prefix(prefix) => {
                Ok((prefix_to_mask(u32::from(*prefix))?, *prefix))
            }
        }
    }
}

/// Converts a dotted-decimal mask (or a numeric prefix string) to a prefix
/// length in [0,32].
///
/// Accepts both notations because OS tooling reports either, depending on
/// the query. Non-contiguous masks are accepted permissively and normalized
/// to their leading-ones count; strict validation is deliberately off.
///
/// # Errors
///
/// Returns [`SubnetError::InvalidMask`] if the input is neither form.
pub fn mask_to_prefix(mask: &str) -> Result<u8, SubnetError> {
    let trimmed = mask.trim();

    // A bare integer is treated as an already-converted prefix length.
    if let Ok(prefix) = trimmed.parse::<u8>() {
        if prefix <= 32 {
            return Ok(prefix);
        }
        return Err(SubnetError::InvalidMask(mask.to_string()));
    }

    let addr: Ipv4Addr = trimmed
        .parse()
        .map_err(|_| SubnetError::InvalidMask(mask.to_string()))?;

    Ok(u8::try_from(u32::from(addr).leading_ones())
        .unwrap_or(32))
}

/// Converts a prefix length in [0,32] to the canonical dotted-decimal mask.
///
/// # Errors
///
/// Returns [`SubnetError::InvalidPrefix`] if the prefix is out of range.
pub fn prefix_to_mask(prefix: u32) -> Result<String, SubnetError> {
    if prefix > 32 {
        return Err(SubnetError::InvalidPrefix(prefix.to_string()));
    }

    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    };

    Ok(Ipv4Addr::from(bits).to_string())
}

/// Converts a prefix string, optionally prefixed with `/`, to a dotted mask.
///
/// # Errors
///
/// Returns [`SubnetError::InvalidPrefix`] if the value is not an integer in
/// [0,32] after stripping the marker.
pub fn prefix_str_to_mask(prefix: &str) -> Result<String, SubnetError> {
    prefix_to_mask(u32::from(parse_prefix(prefix)?))
}

/// Parses a prefix string, accepting an optional leading `/` marker.
fn parse_prefix(prefix: &str) -> Result<u8, SubnetError> {
    let trimmed = prefix.trim().trim_start_matches('/');
    let value: u8 = trimmed
        .parse()
        .map_err(|_| SubnetError::InvalidPrefix(prefix.to_string()))?;
    if value > 32 {
        return Err(SubnetError::InvalidPrefix(prefix.to_string()));
    }
    Ok(value)
}
