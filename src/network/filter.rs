//! Adapter filtering for selective listing.
//!
//! # Design
//!
//! - **Pure matchers**: [`NameRegexFilter`] and [`WirelessFilter`] only
//!   answer "does this adapter match?" without include/exclude semantics.
//! - **Filter chain**: [`FilterChain`] combines matchers with correct
//!   semantics:
//!   - Exclude filters: AND logic (must pass ALL excludes)
//!   - Include filters: OR logic (pass ANY include, empty = match all)

use regex::Regex;

use super::AdapterDescriptor;

/// Trait for filtering network adapters.
///
/// Implementations determine which adapters appear in a listing.
pub trait AdapterFilter {
    /// Returns `true` if the adapter should be included, `false` to filter it out.
    fn matches(&self, adapter: &AdapterDescriptor) -> bool;
}

/// Filters adapters by name pattern (pure matcher).
///
/// Matches against the adapter's OS name and its alias, since users refer
/// to adapters by either.
#[derive(Debug)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a name filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns a reference to the regex pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl AdapterFilter for NameRegexFilter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        self.pattern.is_match(&adapter.name) || self.pattern.is_match(&adapter.alias)
    }
}

/// Matches wireless adapters (pure matcher).
///
/// Use with [`FilterChain::exclude`] to implement a wired-only listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct WirelessFilter;

impl AdapterFilter for WirelessFilter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        adapter.is_wireless
    }
}

/// Filter chain with include OR / exclude AND semantics.
///
/// Evaluation order:
/// 1. **Exclude filters (AND)**: any match rejects the adapter.
/// 2. **Include filters (OR)**: any match accepts; empty includes match all.
#[derive(Default)]
pub struct FilterChain {
    includes: Vec<Box<dyn AdapterFilter>>,
    excludes: Vec<Box<dyn AdapterFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all adapters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include filter (OR semantics).
    #[must_use]
    pub fn include<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.includes.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter (AND semantics - must not match ANY).
    #[must_use]
    pub fn exclude<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Applies the chain to a listing, keeping matching adapters in order.
    #[must_use]
    pub fn apply(&self, adapters: Vec<AdapterDescriptor>) -> Vec<AdapterDescriptor> {
        adapters
            .into_iter()
            .filter(|adapter| self.matches(adapter))
            .collect()
    }
}

impl AdapterFilter for FilterChain {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        if self.excludes.iter().any(|f| f.matches(adapter)) {
            return false;
        }

        self.includes.is_empty() || self.includes.iter().any(|f| f.matches(adapter))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("include_count", &self.includes.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}
